pub mod books;
pub mod driver;
pub mod events;
pub mod fetcher;
mod html;
pub mod quotes;
pub mod registry;
pub mod traits;

pub use books::BooksParser;
pub use driver::PaginationDriver;
pub use events::{stream_sse, ChannelSink, NoopSink, ProgressEvent, HEARTBEAT_FRAME, HEARTBEAT_INTERVAL};
pub use fetcher::HttpFetcher;
pub use quotes::QuotesParser;
pub use registry::{ParserRegistry, Site};
pub use traits::{PageSource, ProgressSink, SiteParser};
