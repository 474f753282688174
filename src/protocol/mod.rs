mod message;

pub use message::{
    ShellCommand, ShellEvent, decode_command, decode_event, encode_command, encode_event,
};
