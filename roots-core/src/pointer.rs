use glam::Vec2;

/// Last known pointer position over the surface.
///
/// The pointer starts inactive with no position; a move makes it active
/// and a leave deactivates it while remembering where it was.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerTracker {
    pub pos: Option<Vec2>,
    pub active: bool,
}

impl PointerTracker {
    pub fn moved(&mut self, pos: Vec2) {
        self.pos = Some(pos);
        self.active = true;
    }

    pub fn left(&mut self) {
        self.active = false;
    }

    /// Position to plant at, if the pointer is currently over the surface.
    pub fn active_position(&self) -> Option<Vec2> {
        if self.active { self.pos } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive() {
        let p = PointerTracker::default();
        assert!(!p.active);
        assert_eq!(p.active_position(), None);
    }

    #[test]
    fn move_then_leave() {
        let mut p = PointerTracker::default();
        p.moved(Vec2::new(3.0, 4.0));
        assert_eq!(p.active_position(), Some(Vec2::new(3.0, 4.0)));

        p.left();
        assert_eq!(p.active_position(), None);
        assert_eq!(p.pos, Some(Vec2::new(3.0, 4.0)));

        p.moved(Vec2::new(1.0, 1.0));
        assert_eq!(p.active_position(), Some(Vec2::new(1.0, 1.0)));
    }
}
