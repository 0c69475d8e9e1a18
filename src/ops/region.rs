use ratatui::layout::Rect;

/// Something the host can hit-test a pointer position against.
pub trait HitRegion {
    fn contains_point(&self, x: u16, y: u16) -> bool;
}

/// A rectangular screen area in cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Region {
            x,
            y,
            width,
            height,
        }
    }
}

impl HitRegion for Region {
    fn contains_point(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x as u32) < self.x as u32 + self.width as u32
            && (y as u32) < self.y as u32 + self.height as u32
    }
}

impl HitRegion for Rect {
    fn contains_point(&self, x: u16, y: u16) -> bool {
        Region::from(*self).contains_point(x, y)
    }
}

impl From<Rect> for Region {
    fn from(r: Rect) -> Self {
        Region::new(r.x, r.y, r.width, r.height)
    }
}

/// The two areas a typeahead owns on screen. A pointer-down that lands in
/// neither of them dismisses the panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutsidePointer {
    pub input: Option<Region>,
    pub panel: Option<Region>,
}

impl OutsidePointer {
    pub fn is_outside(&self, x: u16, y: u16) -> bool {
        let hit = |r: &Option<Region>| r.is_some_and(|r| r.contains_point(x, y));
        !hit(&self.input) && !hit(&self.panel)
    }
}
