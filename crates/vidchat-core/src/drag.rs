//! Pointer-drag repositioning of widget elements.
//!
//! [`Surface`] is a minimal document model: elements with a parent link and
//! a `{top, left}` offset, plus the document-scope listener registry a drag
//! gesture needs while it is active. Each [`DragController`] carries its own
//! [`DragState`]; controllers never share state.

use std::collections::HashMap;
use std::ops::{Add, AddAssign, Sub};

use tracing::debug;

use crate::config::WidgetOffset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Element position relative to the viewport origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offset {
    pub top: i32,
    pub left: i32,
}

impl Offset {
    pub const fn new(top: i32, left: i32) -> Self {
        Self { top, left }
    }
}

impl Add<Point> for Offset {
    type Output = Offset;

    fn add(self, delta: Point) -> Offset {
        Offset::new(
            self.top.saturating_add(delta.y),
            self.left.saturating_add(delta.x),
        )
    }
}

impl AddAssign<Point> for Offset {
    fn add_assign(&mut self, delta: Point) {
        *self = *self + delta;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone)]
struct Element {
    parent: Option<ElementId>,
    offset: Offset,
}

/// Elements and document-scope pointer listeners.
#[derive(Debug, Default)]
pub struct Surface {
    elements: Vec<Element>,
    listeners: HashMap<ListenerId, ElementId>,
    next_listener: u64,
    captured: Option<ElementId>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, parent: Option<ElementId>, offset: Offset) -> ElementId {
        self.elements.push(Element { parent, offset });
        ElementId(self.elements.len() - 1)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id.0).and_then(|e| e.parent)
    }

    pub fn offset(&self, id: ElementId) -> Option<Offset> {
        self.elements.get(id.0).map(|e| e.offset)
    }

    pub fn set_offset(&mut self, id: ElementId, offset: Offset) -> bool {
        match self.elements.get_mut(id.0) {
            Some(element) => {
                element.offset = offset;
                true
            }
            None => false,
        }
    }

    fn offset_mut(&mut self, id: ElementId) -> Option<&mut Offset> {
        self.elements.get_mut(id.0).map(|e| &mut e.offset)
    }

    /// Number of active document-scope listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Element currently holding pointer capture.
    pub fn captured(&self) -> Option<ElementId> {
        self.captured
    }

    fn add_listener(&mut self, owner: ElementId) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, owner);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn capture(&mut self, id: ElementId) {
        self.captured = Some(id);
    }

    fn release(&mut self, id: ElementId) {
        if self.captured == Some(id) {
            self.captured = None;
        }
    }
}

/// Which element a drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// The bound element itself.
    Element,
    /// The bound element's parent (e.g. a header moving its container).
    Parent,
}

/// An active drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub last_pointer: Point,
    pub listener: ListenerId,
    target: ElementId,
}

#[derive(Debug, Clone)]
pub struct DragController {
    element: ElementId,
    handle: Option<ElementId>,
    target: DragTarget,
    state: Option<DragState>,
}

impl DragController {
    pub fn new(element: ElementId, target: DragTarget) -> Self {
        Self {
            element,
            handle: None,
            target,
            state: None,
        }
    }

    /// Also starts drags from `handle`.
    #[must_use]
    pub fn with_handle(mut self, handle: ElementId) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn is_grabbed(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    /// Starts a drag when `hit` is the bound element or its handle.
    ///
    /// Returns false when the press is not ours, a drag is already active,
    /// or the target cannot be resolved.
    pub fn pointer_down(&mut self, surface: &mut Surface, hit: ElementId, at: Point) -> bool {
        if self.state.is_some() || (hit != self.element && Some(hit) != self.handle) {
            return false;
        }
        let target = match self.target {
            DragTarget::Element => Some(self.element),
            DragTarget::Parent => surface.parent(self.element),
        };
        let Some(target) = target.filter(|t| surface.offset(*t).is_some()) else {
            debug!(element = self.element.0, "drag target missing, ignoring press");
            return false;
        };

        surface.capture(hit);
        let listener = surface.add_listener(self.element);
        self.state = Some(DragState {
            last_pointer: at,
            listener,
            target,
        });
        true
    }

    /// Moves the target by the pointer delta. Ignored when idle.
    pub fn pointer_move(&mut self, surface: &mut Surface, at: Point) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let delta = at - state.last_pointer;
        state.last_pointer = at;
        match surface.offset_mut(state.target) {
            Some(offset) => {
                *offset += delta;
                true
            }
            None => false,
        }
    }

    /// Ends the drag and drops its document listener.
    pub fn pointer_up(&mut self, surface: &mut Surface) -> bool {
        let Some(state) = self.state.take() else {
            return false;
        };
        surface.remove_listener(state.listener);
        surface.release(self.element);
        if let Some(handle) = self.handle {
            surface.release(handle);
        }
        true
    }
}

/// Launcher and chat container, each with its drag controller.
#[derive(Debug)]
pub struct WidgetLayout {
    pub launcher: ElementId,
    pub container: ElementId,
    pub header: ElementId,
    pub launcher_drag: DragController,
    pub header_drag: DragController,
}

impl WidgetLayout {
    pub const LAUNCHER_SIZE: Size = Size::new(60, 60);
    pub const CONTAINER_SIZE: Size = Size::new(350, 500);
    /// Space between the launcher and the container above it.
    const GAP: i32 = 10;

    /// Builds the widget elements on `surface`.
    ///
    /// The launcher sits `initial` away from the viewport's bottom-right
    /// corner; the container opens right-aligned just above it.
    pub fn build(surface: &mut Surface, viewport: Size, initial: WidgetOffset) -> Self {
        let launcher_offset = Offset::new(
            viewport.height - initial.bottom - Self::LAUNCHER_SIZE.height,
            viewport.width - initial.right - Self::LAUNCHER_SIZE.width,
        );
        let container_offset = Offset::new(
            (launcher_offset.top - Self::GAP - Self::CONTAINER_SIZE.height).max(0),
            (viewport.width - initial.right - Self::CONTAINER_SIZE.width).max(0),
        );

        let launcher = surface.add_element(None, launcher_offset);
        let container = surface.add_element(None, container_offset);
        let header = surface.add_element(Some(container), Offset::default());

        Self {
            launcher,
            container,
            header,
            launcher_drag: DragController::new(launcher, DragTarget::Element),
            header_drag: DragController::new(header, DragTarget::Parent),
        }
    }
}
