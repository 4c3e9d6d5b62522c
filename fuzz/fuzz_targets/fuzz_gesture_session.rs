#![no_main]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use libfuzzer_sys::fuzz_target;
use sortable_board::{Board, BoardController, BoardLayout, DndRegistry, DragVisualState};
use sortable_core::DragGestureRecognizer;
use sortable_core::event::{Event, KeyCode, MouseButton, MouseEvent, MouseEventKind};

/// Three bytes per event: kind, x, y.
fn decode(chunk: &[u8]) -> Event {
    let (x, y) = (u16::from(chunk[1] % 70), u16::from(chunk[2] % 30));
    let kind = match chunk[0] % 10 {
        0 => MouseEventKind::Down(MouseButton::Left),
        1 | 2 | 3 => MouseEventKind::Drag(MouseButton::Left),
        4 => MouseEventKind::Up(MouseButton::Left),
        5 => MouseEventKind::Moved,
        6 => return Event::Key(KeyCode::Escape),
        7 => return Event::Focus(chunk[1] % 2 == 0),
        8 => MouseEventKind::Down(MouseButton::Right),
        _ => return Event::Key(KeyCode::Other),
    };
    Event::Mouse(MouseEvent::new(kind, x, y))
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 3 * 512 {
        return;
    }
    let registry = DndRegistry::new();
    let controller = Rc::new(RefCell::new(BoardController::new(Board::demo())));
    let layout = BoardLayout::default();
    let mut registered = layout.register(&registry, &controller);
    let mut gestures = DragGestureRecognizer::default();
    let mut now = Instant::now();
    let total = controller.borrow().board().item_count();
    let mut version = 0;

    for chunk in data.chunks_exact(3) {
        now += Duration::from_millis(8);
        for gesture in gestures.process(&decode(chunk), now) {
            // Misuse errors are fine; panics are not.
            let _ = registry.drive(&gesture);
        }

        let board = controller.borrow().board().clone();
        assert_eq!(board.item_count(), total, "item count changed");
        assert!(board.check_invariants().is_empty(), "duplicate ids");

        if !registry.is_dragging() {
            let current = controller.borrow().version();
            if current != version {
                // Positions are stale after a commit.
                version = current;
                drop(registered);
                registered = layout.register(&registry, &controller);
            }
            for container in board.containers() {
                for item in container.items() {
                    let element = registered.item_element(item.id()).expect("card registered");
                    assert_eq!(
                        registry.visual_state(element),
                        Some(DragVisualState::Idle),
                        "visual state not reset after session"
                    );
                }
            }
        }
    }
});
