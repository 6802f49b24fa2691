//! Chunked streaming of a record buffer across repeated bounded calls.
//!
//! The engine keeps no per-caller state: the cursor travels in the command
//! argument and the caller resubmits the rewritten command until it sees
//! [`ExecutionResult::ExecutedCompletely`].

use sensornode_domain::command::{Argument, CommandType, ExecutionResult, StreamCursor};
use sensornode_domain::record::{SensorReading, SystemLogEntry};
use sensornode_domain::response::ResponseItem;

use super::{CommandEngine, HandlerResult, argument};
use crate::ports::{ConfigStore, RecordBuffer, ResponseWriter};

/// Append records from `buffer` starting at the cursor until the response
/// is full or the buffer is exhausted.
///
/// Returns the cursor to resubmit and whether the whole buffer has now been
/// sent. A reset clears the buffer first and starts from zero. An offset
/// past the end (the buffer shrank in between) is clamped to the end.
pub fn stream_records<B, W>(
    buffer: &B,
    cursor: StreamCursor,
    response: &mut W,
) -> (StreamCursor, ExecutionResult)
where
    B: RecordBuffer,
    B::Record: Into<ResponseItem>,
    W: ResponseWriter,
{
    let mut offset = cursor.offset;
    if cursor.reset {
        buffer.clear();
        offset = 0;
    }

    let total = buffer.len();
    if offset > total {
        tracing::debug!(offset, total, "cursor past end of buffer");
        offset = total;
    }

    let mut next = offset;
    while next < total {
        let Some(record) = buffer.get(next) else {
            break;
        };
        if response.append(record.into()).is_err() {
            break;
        }
        next += 1;
    }
    tracing::debug!(from = offset, to = next, total, "streamed records");

    let result = if next == total {
        ExecutionResult::ExecutedCompletely
    } else {
        ExecutionResult::ExecutedPartially
    };
    (StreamCursor::at(next), result)
}

impl<S, SL, RL> CommandEngine<S, SL, RL>
where
    S: ConfigStore,
    SL: RecordBuffer<Record = SystemLogEntry>,
    RL: RecordBuffer<Record = SensorReading>,
{
    pub(super) fn stream_system<W: ResponseWriter>(
        &self,
        argument: &mut Option<Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let cursor = argument::cursor(CommandType::System, argument.as_ref())?;
        let (next, result) = stream_records(&self.system_log, cursor, response);
        *argument = Some(Argument::Cursor(next));
        Ok(result)
    }

    pub(super) fn stream_readings<W: ResponseWriter>(
        &self,
        argument: &mut Option<Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let cursor = argument::cursor(CommandType::Readings, argument.as_ref())?;
        let (next, result) = stream_records(&self.readings, cursor, response);
        *argument = Some(Argument::Cursor(next));
        Ok(result)
    }
}
