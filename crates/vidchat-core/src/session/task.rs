use tokio_util::sync::CancellationToken;

use super::message::MessageId;
use crate::transport::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Debug, Default)]
pub struct RequestSeq {
    next: u64,
}

impl RequestSeq {
    pub fn next_id(&mut self) -> RequestId {
        let id = RequestId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Bookkeeping for one in-flight chat request.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// Display entry shown while the request runs.
    pub placeholder: MessageId,
    pub cancel: CancellationToken,
}

/// Events posted to the session inbox by spawned request tasks.
#[derive(Debug)]
pub enum SessionEvent {
    ReplyCompleted {
        id: RequestId,
        result: Result<String, TransportError>,
    },
}
