mod fetch_spy;
mod forward_spy_classifier;
mod load_spy;

pub use fetch_spy::{FetchSpy, FetchSpyHandle};
pub use forward_spy_classifier::{ForwardSpyClassifier, ForwardSpyHandle};
pub use load_spy::{LoadSpy, LoadSpyHandle};
