use serde::{Deserialize, Serialize};

pub type ShapeId = u32;
pub type EdgeId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + 0.5 * self.w,
            y: self.y + 0.5 * self.h,
        }
    }

    pub fn top_left(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.w, self.y),
            Point::new(self.x + self.w, self.y + self.h),
            Point::new(self.x, self.y + self.h),
        ]
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Rect> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (mut minx, mut miny, mut maxx, mut maxy) = (first.x, first.y, first.x, first.y);
        for p in it {
            minx = minx.min(p.x);
            miny = miny.min(p.y);
            maxx = maxx.max(p.x);
            maxy = maxy.max(p.y);
        }
        Some(Rect {
            x: minx,
            y: miny,
            w: maxx - minx,
            h: maxy - miny,
        })
    }
}

/// One node of a curved path. `c1` is the incoming control point, `c2` the
/// outgoing one; both sit on `main` until the node is curved.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub main: Point,
    pub c1: Point,
    pub c2: Point,
}

impl PathNode {
    pub fn corner(main: Point) -> Self {
        PathNode {
            main,
            c1: main,
            c2: main,
        }
    }

    pub fn curved(main: Point, c1: Point, c2: Point) -> Self {
        PathNode { main, c1, c2 }
    }

    /// Coordinate by selector: 0 main, 1 incoming control, 2 outgoing control.
    pub fn coord(&self, selector: i32) -> Option<Point> {
        match selector {
            0 => Some(self.main),
            1 => Some(self.c1),
            2 => Some(self.c2),
            _ => None,
        }
    }

    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        self.main = self.main.offset(dx, dy);
        self.c1 = self.c1.offset(dx, dy);
        self.c2 = self.c2.offset(dx, dy);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeKind {
    Rect { bounds: Rect },
    Ellipse { bounds: Rect },
    Path { nodes: Vec<PathNode>, closed: bool },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub duration: f32,
}

impl Task {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Task {
            name: name.into(),
            duration,
        }
    }

    /// Duration used by scheduling; garbage reads as zero.
    pub fn effective_duration(&self) -> f32 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.duration
        } else {
            0.0
        }
    }
}

/// What a shape is allowed to take part in. Only tasks join the dependency graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ShapeRole {
    #[default]
    Plain,
    Task(Task),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    #[serde(default)]
    pub role: ShapeRole,
}

impl Shape {
    pub fn rect(bounds: Rect) -> Self {
        Shape {
            kind: ShapeKind::Rect { bounds },
            role: ShapeRole::Plain,
        }
    }

    pub fn ellipse(bounds: Rect) -> Self {
        Shape {
            kind: ShapeKind::Ellipse { bounds },
            role: ShapeRole::Plain,
        }
    }

    pub fn path(nodes: Vec<PathNode>, closed: bool) -> Self {
        Shape {
            kind: ShapeKind::Path { nodes, closed },
            role: ShapeRole::Plain,
        }
    }

    /// A rectangular task box, the usual dependency-graph participant.
    pub fn task(bounds: Rect, task: Task) -> Self {
        Shape {
            kind: ShapeKind::Rect { bounds },
            role: ShapeRole::Task(task),
        }
    }

    pub fn with_role(mut self, role: ShapeRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_dependency_participant(&self) -> bool {
        matches!(self.role, ShapeRole::Task(_))
    }

    pub fn task_info(&self) -> Option<&Task> {
        match &self.role {
            ShapeRole::Task(t) => Some(t),
            ShapeRole::Plain => None,
        }
    }

    pub fn path_nodes(&self) -> &[PathNode] {
        match &self.kind {
            ShapeKind::Path { nodes, .. } => nodes,
            _ => &[],
        }
    }

    pub(crate) fn path_nodes_mut(&mut self) -> Option<&mut Vec<PathNode>> {
        match &mut self.kind {
            ShapeKind::Path { nodes, .. } => Some(nodes),
            _ => None,
        }
    }

    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        match &mut self.kind {
            ShapeKind::Rect { bounds } | ShapeKind::Ellipse { bounds } => {
                bounds.x += dx;
                bounds.y += dy;
            }
            ShapeKind::Path { nodes, .. } => {
                for n in nodes.iter_mut() {
                    n.translate(dx, dy);
                }
            }
        }
    }
}
