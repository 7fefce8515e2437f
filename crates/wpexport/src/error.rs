#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid XML at byte {position}: {reason}")]
    Xml { position: u64, reason: String },

    #[error("Unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    #[error("Unclosed element <{0}> at end of document")]
    UnclosedElement(String),

    #[error("No rss.channel in the export")]
    MissingChannel,
}
