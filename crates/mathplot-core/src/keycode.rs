//! Input event vocabulary shared by all window adapters.
//!
//! The [`Key`] enumeration deliberately mirrors the GLFW numeric scheme so a
//! saved binding or a debug print is directly comparable against GLFW
//! documentation. Window adapters translate their toolkit's key events into
//! this enum.

/// Keyboard keys. Discriminants follow the GLFW numeric scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Key {
    Unknown = -1,
    Space = 32,
    Apostrophe = 39,
    Comma = 44,
    Minus = 45,
    Period = 46,
    Slash = 47,
    Num0 = 48,
    Num1 = 49,
    Num2 = 50,
    Num3 = 51,
    Num4 = 52,
    Num5 = 53,
    Num6 = 54,
    Num7 = 55,
    Num8 = 56,
    Num9 = 57,
    Semicolon = 59,
    Equal = 61,
    A = 65,
    B = 66,
    C = 67,
    D = 68,
    E = 69,
    F = 70,
    G = 71,
    H = 72,
    I = 73,
    J = 74,
    K = 75,
    L = 76,
    M = 77,
    N = 78,
    O = 79,
    P = 80,
    Q = 81,
    R = 82,
    S = 83,
    T = 84,
    U = 85,
    V = 86,
    W = 87,
    X = 88,
    Y = 89,
    Z = 90,
    LeftBracket = 91,
    Backslash = 92,
    RightBracket = 93,
    GraveAccent = 96,
    Escape = 256,
    Enter = 257,
    Tab = 258,
    Backspace = 259,
    Insert = 260,
    Delete = 261,
    Right = 262,
    Left = 263,
    Down = 264,
    Up = 265,
    PageUp = 266,
    PageDown = 267,
    Home = 268,
    End = 269,
    CapsLock = 280,
    ScrollLock = 281,
    NumLock = 282,
    PrintScreen = 283,
    Pause = 284,
    F1 = 290,
    F2 = 291,
    F3 = 292,
    F4 = 293,
    F5 = 294,
    F6 = 295,
    F7 = 296,
    F8 = 297,
    F9 = 298,
    F10 = 299,
    F11 = 300,
    F12 = 301,
    F13 = 302,
    F14 = 303,
    F15 = 304,
    F16 = 305,
    F17 = 306,
    F18 = 307,
    F19 = 308,
    F20 = 309,
    F21 = 310,
    F22 = 311,
    F23 = 312,
    F24 = 313,
    F25 = 314,
    Kp0 = 320,
    Kp1 = 321,
    Kp2 = 322,
    Kp3 = 323,
    Kp4 = 324,
    Kp5 = 325,
    Kp6 = 326,
    Kp7 = 327,
    Kp8 = 328,
    Kp9 = 329,
    KpDecimal = 330,
    KpDivide = 331,
    KpMultiply = 332,
    KpSubtract = 333,
    KpAdd = 334,
    KpEnter = 335,
    KpEqual = 336,
    LeftShift = 340,
    LeftControl = 341,
    LeftAlt = 342,
    LeftSuper = 343,
    RightShift = 344,
    RightControl = 345,
    RightAlt = 346,
    RightSuper = 347,
    Menu = 348,
}

impl Key {
    /// Returns the F-key index (1-based) if this is F1..F10, used for model
    /// selection bindings.
    #[must_use]
    pub fn function_index(self) -> Option<usize> {
        let code = self as i32;
        let f1 = Key::F1 as i32;
        let f10 = Key::F10 as i32;
        if (f1..=f10).contains(&code) {
            Some((code - f1 + 1) as usize)
        } else {
            None
        }
    }
}

/// Modifier key state delivered with key and button events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub superkey: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
        superkey: false,
    };

    /// Control only.
    #[must_use]
    pub fn control() -> Self {
        Self {
            control: true,
            ..Self::NONE
        }
    }

    /// Shift only.
    #[must_use]
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }
}

/// Mouse buttons the scene reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button; drives rotation.
    Left,
    /// Secondary button; drives translation.
    Right,
    /// Any other button; ignored by the scene.
    Unhandled,
}

/// Press/release/repeat state of a key or button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Press,
    Release,
    Repeat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glfw_discriminants() {
        assert_eq!(Key::Space as i32, 32);
        assert_eq!(Key::A as i32, 65);
        assert_eq!(Key::Escape as i32, 256);
        assert_eq!(Key::F1 as i32, 290);
        assert_eq!(Key::LeftControl as i32, 341);
    }

    #[test]
    fn test_function_index() {
        assert_eq!(Key::F1.function_index(), Some(1));
        assert_eq!(Key::F10.function_index(), Some(10));
        assert_eq!(Key::F11.function_index(), None);
        assert_eq!(Key::A.function_index(), None);
    }
}
