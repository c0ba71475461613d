//! Component M and friends: the tools the pipeline wraps. Only
//! `select_intent` is implemented here — `write_to_file` and
//! `execute_command` are external collaborators the host supplies as the
//! pipeline's `next` closure.

pub mod select_intent;
