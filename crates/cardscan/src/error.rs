use cardscan_detect::errors::DetectError;

/// Errors that can occur while scanning an image for a card.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScanError {
    /// Error raised by the rectangle detector.
    #[error(transparent)]
    DetectError(#[from] DetectError),

    /// The detection worker stopped without sending a result.
    #[error("The detection worker exited without a result")]
    WorkerDisconnected,
}
