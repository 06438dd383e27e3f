use std::vec::IntoIter;

use super::{MazeMaker, Room};
use crate::grid::Direction;

pub trait Backtrack {
    fn backtrack(&mut self);
}

// A room on the current corridor and the directions it has yet to try.
struct Frame {
    room: Room,
    pending: IntoIter<Direction>,
}

impl Backtrack for MazeMaker {
    fn backtrack(&mut self) {
        let start = Room::new(0, 0);
        self.visit_room(start);

        let mut stack = vec![Frame {
            room: start,
            pending: self.shuffled_directions().into_iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            let curr = frame.room;
            let Some(direction) = frame.pending.next() else {
                stack.pop();
                continue;
            };

            if let Some(next) = self.unvisited_neighbor(curr, direction) {
                self.remove_wall_between(curr, next);
                self.visit_room(next);
                stack.push(Frame {
                    room: next,
                    pending: self.shuffled_directions().into_iter(),
                });
            }
        }
    }
}
