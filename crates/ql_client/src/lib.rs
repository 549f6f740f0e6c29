pub mod decode;
pub mod presenter;
pub mod source;

pub use decode::{decode_articles, decode_posts};
pub use presenter::{FetchState, Presenter, Settlement, View};
pub use source::{ArticleSource, QiitaClient};
