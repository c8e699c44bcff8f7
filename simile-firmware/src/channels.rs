//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy
//! tasks. The engine task is the sole consumer, so all writes to the
//! animation store funnel through one place.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::String;

use simile_protocol::MAX_LINE_LEN;

/// Channel capacity for complete protocol lines
///
/// Lines are large, so the queue is kept shallow; the host-side flow is
/// command/response anyway.
const LINE_CHANNEL_SIZE: usize = 2;

/// One complete protocol line, terminator stripped
pub type Line = String<MAX_LINE_LEN>;

/// Complete lines from the serial link, awaiting the engine
pub static LINE_CHANNEL: Channel<CriticalSectionRawMutex, Line, LINE_CHANNEL_SIZE> = Channel::new();
