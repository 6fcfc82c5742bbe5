use blockfall_core::Action;

/// Keyboard bindings from the game page: arrows move and rotate, space
/// hard-drops, shift holds. Anything else is dropped here so the engine
/// only ever sees valid commands.
pub fn action_for_key(key: &str) -> Option<Action> {
    Some(match key {
        "ArrowLeft" => Action::Left,
        "ArrowRight" => Action::Right,
        "ArrowDown" => Action::SoftDrop,
        "ArrowUp" => Action::RotateCw,
        " " => Action::HardDrop,
        "Shift" => Action::Hold,
        _ => return None,
    })
}
