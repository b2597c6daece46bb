//! Swapping the factory backend at runtime.
//!
//! Kept in its own test binary: the factory is process-wide state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kern_core::{Guarded, Mutex, MutexFactory, ReentrantMutex};
use kern_status::{KResult, Status};

static CREATED: AtomicUsize = AtomicUsize::new(0);

struct Counting(ReentrantMutex);

unsafe impl Mutex for Counting {
    fn acquire(&self, blocking: bool, timeout: Option<Duration>) -> KResult<bool> {
        self.0.acquire(blocking, timeout)
    }

    fn release(&self) -> Status {
        self.0.release()
    }

    fn backend(&self) -> &'static str {
        "counting"
    }
}

fn make_counting() -> Arc<dyn Mutex> {
    CREATED.fetch_add(1, Ordering::SeqCst);
    Arc::new(Counting(ReentrantMutex::new()))
}

#[test]
fn swap_affects_only_new_mutexes() {
    let before = MutexFactory::create_mutex();
    assert_eq!(before.backend(), "reentrant");

    MutexFactory::set_implementation(make_counting);
    let after = MutexFactory::create_mutex();
    let guarded = Guarded::new(1u32);
    assert_eq!(after.backend(), "counting");
    assert_eq!(guarded.mutex().backend(), "counting");
    assert_eq!(CREATED.load(Ordering::SeqCst), 2);

    // Existing mutexes keep their backend and keep working.
    assert_eq!(before.backend(), "reentrant");
    assert!(before.lock().is_ok());
    *guarded.lock().unwrap() += 1;
    assert_eq!(*guarded.lock().unwrap(), 2);

    MutexFactory::reset_implementation();
    assert_eq!(MutexFactory::create_mutex().backend(), "reentrant");
    assert_eq!(CREATED.load(Ordering::SeqCst), 2);
}
