#![doc = include_str!("../../../README.md")]
#![expect(clippy::cast_possible_truncation, reason = "numeric narrowing is checked")]
// first to include the arena every other module allocates into
mod heap;

mod args;
mod binary;
mod builtins;
mod evaluate;
mod exception_private;
mod exception_public;
mod expressions;
mod io;
mod namespace;
mod object;
mod parse;
mod prepare;
mod resource;
mod run;
pub mod scripts;
mod types;
mod value;

pub use crate::{
    exception_private::ExcType,
    exception_public::{CodeLoc, Exception, StackFrame},
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    object::Object,
    resource::{
        LARGE_RESULT_THRESHOLD, LimitedTracker, MAX_DATA_RECURSION_DEPTH, NoLimitTracker, ResourceError,
        ResourceLimits, ResourceTracker,
    },
    run::{RunOutput, Runner},
};
