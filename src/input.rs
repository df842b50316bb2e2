//! Jump input sources
//!
//! Both the keyboard and the on-screen button map to the one jump action.

/// `KeyboardEvent.code` that triggers a jump
pub const JUMP_KEY_CODE: &str = "Space";

/// Id of the on-screen jump button
pub const JUMP_BUTTON_ID: &str = "jump-btn";

pub fn is_jump_key(code: &str) -> bool {
    code == JUMP_KEY_CODE
}
