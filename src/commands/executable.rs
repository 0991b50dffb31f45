use std::sync::Arc;

use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Every command resolves to exactly one reply frame. The only errors that
/// cross this boundary are snapshot I/O failures, which the caller treats
/// as fatal; command-level failures are themselves reply frames.
pub trait Executable {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame>;
}
