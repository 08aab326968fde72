use crate::core::Result;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Shared-ownership handle over mutable storage.
///
/// Every clone points at the same storage; nothing is copied. Borrow
/// conflicts surface as `BagError::BorrowConflict` instead of panicking.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Borrow the storage for reading
    pub fn read(&self) -> Result<Ref<'_, T>> {
        Ok(self.0.try_borrow()?)
    }

    /// Borrow the storage for writing
    pub fn write(&self) -> Result<RefMut<'_, T>> {
        Ok(self.0.try_borrow_mut()?)
    }

    /// Same storage, not merely equal contents.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to the storage.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Stable address of the storage, used for cycle detection.
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

thread_local! {
    /// Storage addresses currently being formatted on this thread.
    static DEBUG_PATH: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = self.addr();
        let entered = DEBUG_PATH.with(|path| {
            let mut path = path.borrow_mut();
            if path.contains(&addr) {
                false
            } else {
                path.push(addr);
                true
            }
        });
        if !entered {
            return write!(f, "Shared(<cycle {:#x}>)", addr);
        }

        let result = match self.0.try_borrow() {
            Ok(inner) => fmt::Debug::fmt(&*inner, f),
            Err(_) => write!(f, "<borrowed>"),
        };
        DEBUG_PATH.with(|path| {
            path.borrow_mut().pop();
        });
        result
    }
}
