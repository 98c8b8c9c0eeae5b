//! Animatable trait

/// Something advanced by the animation driver once per frame.
///
/// Frames are delivered in display order. Implementations must treat a
/// non-positive `dt` as a no-op.
pub trait Animatable {
    /// Advance by `dt` seconds
    fn advance_time(&mut self, dt: f64);

    /// True once this object has nothing left to do and can be dropped
    fn is_complete(&self) -> bool {
        false
    }
}

impl<T: Animatable + ?Sized> Animatable for Box<T> {
    fn advance_time(&mut self, dt: f64) {
        (**self).advance_time(dt);
    }

    fn is_complete(&self) -> bool {
        (**self).is_complete()
    }
}
