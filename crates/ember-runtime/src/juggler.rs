//! Juggler: advances a set of animatables each frame

use crate::animatable::Animatable;
use log::debug;

/// Owns a list of animatables and advances them together.
///
/// Objects are advanced in insertion order; any that report completion
/// after a frame are removed.
#[derive(Default)]
pub struct Juggler {
    objects: Vec<Box<dyn Animatable>>,
    elapsed: f64,
}

impl Juggler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: Box<dyn Animatable>) {
        self.objects.push(object);
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total time this juggler has been advanced
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl Animatable for Juggler {
    fn advance_time(&mut self, dt: f64) {
        if !(dt > 0.0) {
            return;
        }
        self.elapsed += dt;
        for object in &mut self.objects {
            object.advance_time(dt);
        }
        let before = self.objects.len();
        self.objects.retain(|o| !o.is_complete());
        let removed = before - self.objects.len();
        if removed > 0 {
            debug!("juggler dropped {removed} completed animatable(s)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Completes after accumulating `limit` seconds
    struct Countdown {
        total: Rc<Cell<f64>>,
        limit: f64,
    }

    impl Animatable for Countdown {
        fn advance_time(&mut self, dt: f64) {
            self.total.set(self.total.get() + dt);
        }

        fn is_complete(&self) -> bool {
            self.total.get() >= self.limit
        }
    }

    #[test]
    fn advances_and_drops_completed() {
        let short = Rc::new(Cell::new(0.0));
        let long = Rc::new(Cell::new(0.0));
        let mut juggler = Juggler::new();
        juggler.add(Box::new(Countdown {
            total: short.clone(),
            limit: 0.5,
        }));
        juggler.add(Box::new(Countdown {
            total: long.clone(),
            limit: 10.0,
        }));

        juggler.advance_time(0.25);
        assert_eq!(juggler.len(), 2);
        juggler.advance_time(0.25);
        assert_eq!(juggler.len(), 1);
        juggler.advance_time(0.25);

        assert_eq!(short.get(), 0.5);
        assert_eq!(long.get(), 0.75);
        assert_eq!(juggler.elapsed(), 0.75);
    }

    #[test]
    fn non_positive_dt_is_ignored() {
        let total = Rc::new(Cell::new(0.0));
        let mut juggler = Juggler::new();
        juggler.add(Box::new(Countdown {
            total: total.clone(),
            limit: 1.0,
        }));
        juggler.advance_time(0.0);
        juggler.advance_time(-1.0);
        assert_eq!(total.get(), 0.0);
        assert_eq!(juggler.elapsed(), 0.0);
    }
}
