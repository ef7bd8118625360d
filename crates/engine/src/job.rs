//! The job queue: the engine's sole
//! concurrency primitive. After the execution-context stack empties,
//! the Context dequeues jobs FIFO and runs each under its recorded
//! realm by pushing a fresh execution context; a job may itself
//! schedule further jobs.

use crate::object::JsObject;
use crate::value::JsValue;
use std::collections::VecDeque;
use vesper_gc::{Finalize, Trace};

/// The two job kinds. Both are represented as closures
/// over already-resolved values rather than re-dispatched by name,
/// since by the time a job is enqueued every value it needs (the
/// reaction handler, the settled value) is already known.
pub enum Job {
    PromiseReaction {
        handler: Option<JsObject>,
        argument: JsValue,
        capability: Option<crate::builtins::promise::PromiseCapability>,
    },
    PromiseResolveThenable {
        promise: JsObject,
        thenable: JsValue,
        then: JsObject,
    },
}

impl Finalize for Job {
    fn finalize(&self) {
        match self {
            Job::PromiseReaction {
                handler, argument, capability,
            } => {
                handler.finalize();
                argument.finalize();
                capability.finalize();
            }
            Job::PromiseResolveThenable { promise, thenable, then } => {
                promise.finalize();
                thenable.finalize();
                then.finalize();
            }
        }
    }
}
unsafe impl Trace for Job {
    fn trace(&self) {
        match self {
            Job::PromiseReaction {
                handler, argument, capability,
            } => {
                handler.trace();
                argument.trace();
                capability.trace();
            }
            Job::PromiseResolveThenable { promise, thenable, then } => {
                promise.trace();
                thenable.trace();
                then.trace();
            }
        }
    }
}

#[derive(Default)]
pub struct JobQueue {
    queue: VecDeque<Job>,
}

impl JobQueue {
    pub fn enqueue(&mut self, job: Job) {
        self.queue.push_back(job);
    }

    pub fn pop(&mut self) -> Option<Job> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
