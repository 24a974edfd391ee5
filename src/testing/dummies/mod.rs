mod classifier_short_output;
mod unreachable_fetcher;

pub use classifier_short_output::ClassifierShortOutput;
pub use unreachable_fetcher::UnreachableFetcher;
