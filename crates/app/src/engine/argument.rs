//! Argument extraction: check that a command carries the argument variant
//! its handler expects, and that the value fits the target field.

use sensornode_domain::address::KnxAddress;
use sensornode_domain::alarm::AlarmThresholds;
use sensornode_domain::command::{
    ActuatorTarget, Argument, ArgumentKind, CommandType, StreamCursor,
};
use sensornode_domain::config::ConfigKey;
use sensornode_domain::error::ValidationError;

fn mismatch(command: CommandType, expected: ArgumentKind, argument: &Argument) -> ValidationError {
    ValidationError::ArgumentMismatch {
        command,
        expected,
        actual: argument.kind(),
    }
}

pub(crate) fn unsigned(command: CommandType, argument: &Argument) -> Result<u32, ValidationError> {
    match argument {
        Argument::Unsigned(value) => Ok(*value),
        other => Err(mismatch(command, ArgumentKind::Unsigned, other)),
    }
}

/// An unsigned argument that must fit in `T` (e.g. a `u16` port).
pub(crate) fn bounded<T>(command: CommandType, argument: &Argument) -> Result<T, ValidationError>
where
    T: TryFrom<u32> + Into<u32> + Bounded,
{
    let value = unsigned(command, argument)?;
    T::try_from(value).map_err(|_| ValidationError::OutOfRange {
        command,
        value,
        max: T::MAX_VALUE.into(),
    })
}

/// Upper bound of a narrow unsigned field.
pub(crate) trait Bounded {
    const MAX_VALUE: Self;
}

impl Bounded for u16 {
    const MAX_VALUE: Self = u16::MAX;
}

impl Bounded for u8 {
    const MAX_VALUE: Self = u8::MAX;
}

pub(crate) fn flag(command: CommandType, argument: &Argument) -> Result<bool, ValidationError> {
    match argument {
        Argument::Flag(value) => Ok(*value),
        other => Err(mismatch(command, ArgumentKind::Flag, other)),
    }
}

/// A text argument that fits the storage behind `key`.
pub(crate) fn text<'a>(
    command: CommandType,
    key: ConfigKey,
    argument: &'a Argument,
) -> Result<&'a str, ValidationError> {
    let Argument::Text(value) = argument else {
        return Err(mismatch(command, ArgumentKind::Text, argument));
    };
    match key.capacity() {
        Some(max) if value.len() > max => Err(ValidationError::TooLong {
            command,
            max,
            actual: value.len(),
        }),
        _ => Ok(value),
    }
}

pub(crate) fn address(
    command: CommandType,
    argument: &Argument,
) -> Result<KnxAddress, ValidationError> {
    match argument {
        Argument::Address(value) => Ok(*value),
        other => Err(mismatch(command, ArgumentKind::Address, other)),
    }
}

pub(crate) fn alarms(
    command: CommandType,
    argument: &Argument,
) -> Result<AlarmThresholds, ValidationError> {
    match argument {
        Argument::Alarms(value) => Ok(*value),
        other => Err(mismatch(command, ArgumentKind::Alarms, other)),
    }
}

pub(crate) fn actuator(
    command: CommandType,
    argument: &Argument,
) -> Result<&ActuatorTarget, ValidationError> {
    match argument {
        Argument::Actuator(value) => Ok(value),
        other => Err(mismatch(command, ArgumentKind::Actuator, other)),
    }
}

/// The streaming cursor of `SYSTEM`/`READINGS`.
///
/// No argument means "continue from the start"; a bare flag is shorthand
/// for the reset request.
pub(crate) fn cursor(
    command: CommandType,
    argument: Option<&Argument>,
) -> Result<StreamCursor, ValidationError> {
    match argument {
        None => Ok(StreamCursor::default()),
        Some(Argument::Cursor(cursor)) => Ok(*cursor),
        Some(Argument::Flag(reset)) => Ok(StreamCursor {
            reset: *reset,
            offset: 0,
        }),
        Some(other) => Err(mismatch(command, ArgumentKind::Cursor, other)),
    }
}
