//! Canned reply frames. The strings are part of the wire contract and must
//! not drift.

use crate::frame::Frame;

pub fn ok() -> Frame {
    Frame::Simple("OK".to_string())
}

pub fn invalid_command() -> Frame {
    Frame::Error("ERR Invalid Command".to_string())
}

pub fn wrong_type() -> Frame {
    Frame::Error("WRONGTYPE Operation against a key holding the wrong kind of value".to_string())
}

pub fn not_an_integer() -> Frame {
    Frame::Error("ERR value is not an integer or out of range".to_string())
}

pub fn no_such_key() -> Frame {
    Frame::Error("ERR no such key".to_string())
}
