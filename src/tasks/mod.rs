mod tumor_detector;

pub use tumor_detector::TumorDetector;
