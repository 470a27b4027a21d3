use log::trace;

/// Select bit in P1 (0xFF00) for the direction keys, active low.
const SELECT_DIRECTIONS: u8 = 0x10;
/// Select bit in P1 (0xFF00) for the action buttons, active low.
const SELECT_BUTTONS: u8 = 0x20;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    Select,
    Start,
}

impl Button {
    fn line(self) -> u8 {
        match self {
            Button::A => 0x01,
            Button::B => 0x02,
            Button::Select => 0x04,
            Button::Start => 0x08,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    fn line(self) -> u8 {
        match self {
            Direction::Right => 0x01,
            Direction::Left => 0x02,
            Direction::Up => 0x04,
            Direction::Down => 0x08,
        }
    }
}

/// Controller line state. Lines are active low: a 0 bit means pressed.
#[derive(Debug, Clone)]
pub struct Joypad {
    buttons: u8,
    directions: u8,
    select: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Joypad {
    pub fn new() -> Self {
        Self {
            buttons: 0x0F,
            directions: 0x0F,
            // Neither group selected.
            select: SELECT_DIRECTIONS | SELECT_BUTTONS,
        }
    }

    /// Latch the select bits from a P1 write.
    pub fn write_select(&mut self, val: u8) {
        self.select = val & (SELECT_DIRECTIONS | SELECT_BUTTONS);
    }

    /// The value software reads back from P1.
    pub fn register(&self) -> u8 {
        let mut lines = 0x0F;
        if self.select & SELECT_DIRECTIONS == 0 {
            lines &= self.directions;
        }
        if self.select & SELECT_BUTTONS == 0 {
            lines &= self.buttons;
        }
        0xC0 | self.select | lines
    }

    /// Returns true when a released line went low while its group is selected.
    pub fn set_button(&mut self, button: Button) -> bool {
        let line = button.line();
        let newly_pressed = self.buttons & line != 0;
        self.buttons &= !line;
        trace!("joypad: press {:?}", button);
        newly_pressed && self.select & SELECT_BUTTONS == 0
    }

    pub fn clear_button(&mut self, button: Button) {
        self.buttons |= button.line();
    }

    /// Returns true when a released line went low while its group is selected.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let line = direction.line();
        let newly_pressed = self.directions & line != 0;
        self.directions &= !line;
        trace!("joypad: press {:?}", direction);
        newly_pressed && self.select & SELECT_DIRECTIONS == 0
    }

    pub fn clear_direction(&mut self, direction: Direction) {
        self.directions |= direction.line();
    }
}
