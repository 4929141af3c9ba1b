#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    // Affine 2D: [a, b, c, d, e, f] for matrix [[a c e],[b d f],[0 0 1]]
    pub m: [f32; 6],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }

    /// Build from the document's row layout `[[a, c, tx], [b, d, ty]]`.
    pub fn from_rows(rows: [[f32; 3]; 2]) -> Self {
        let [[a, c, e], [b, d, f]] = rows;
        Self {
            m: [a, b, c, d, e, f],
        }
    }

    /// Inverse of [`Transform2D::from_rows`].
    pub fn to_rows(self) -> [[f32; 3]; 2] {
        let [a, b, c, d, e, f] = self.m;
        [[a, c, e], [b, d, f]]
    }

    /// Compose two transforms: self ∘ other (apply `other`, then `self`).
    ///
    /// A node's world transform is `parent_world.concat(local)`.
    pub fn concat(self, other: Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.m;
        let [a2, b2, c2, d2, e2, f2] = other.m;
        let a = a1 * a2 + c1 * b2;
        let b = b1 * a2 + d1 * b2;
        let c = a1 * c2 + c1 * d2;
        let d = b1 * c2 + d1 * d2;
        let e = a1 * e2 + c1 * f2 + e1;
        let f = b1 * e2 + d1 * f2 + f1;
        Self {
            m: [a, b, c, d, e, f],
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, tx, ty],
        }
    }

    pub fn rotate(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            m: [cos, sin, -sin, cos, 0.0, 0.0],
        }
    }

    /// Translation component `(e, f)`.
    pub fn translation(&self) -> [f32; 2] {
        [self.m[4], self.m[5]]
    }

    /// Shift the translation component in place, leaving the linear part alone.
    pub fn translate_by(&mut self, dx: f32, dy: f32) {
        self.m[4] += dx;
        self.m[5] += dy;
    }

    pub fn determinant(&self) -> f32 {
        self.m[0] * self.m[3] - self.m[1] * self.m[2]
    }

    /// Inverse transform, or `None` when the determinant is zero (or the
    /// reciprocal overflows, which is the same thing in f32).
    pub fn invert(&self) -> Option<Self> {
        let [a, b, c, d, e, f] = self.m;
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        if !inv_det.is_finite() {
            return None;
        }
        let ia = d * inv_det;
        let ib = -b * inv_det;
        let ic = -c * inv_det;
        let id = a * inv_det;
        // Inverse translation = -inv_linear * [e, f]
        let ie = -(ia * e + ic * f);
        let iff = -(ib * e + id * f);
        Some(Self {
            m: [ia, ib, ic, id, ie, iff],
        })
    }

    /// Apply the transform to a point (x, y).
    pub fn apply(&self, p: [f32; 2]) -> [f32; 2] {
        let [a, b, c, d, e, f] = self.m;
        [a * p[0] + c * p[1] + e, b * p[0] + d * p[1] + f]
    }

    /// Apply the inverse transform to a world-space point. Returns None if non-invertible.
    pub fn inverse_apply(&self, p: [f32; 2]) -> Option<[f32; 2]> {
        self.invert().map(|inv| inv.apply(p))
    }

    /// Axis-aligned box enclosing the four mapped corners of `rect`.
    pub fn map_rect(&self, rect: Rect) -> Rect {
        let corners = [
            self.apply([rect.x, rect.y]),
            self.apply([rect.x + rect.w, rect.y]),
            self.apply([rect.x, rect.y + rect.h]),
            self.apply([rect.x + rect.w, rect.y + rect.h]),
        ];
        Rect::from_points(corners).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorLinPremul {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Alias for the premultiplied linear color type, for a friendlier name in APIs.
pub type Color = ColorLinPremul;

// Constructors for ColorLinPremul are defined in color.rs to keep scene.rs focused

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, p: [f32; 2]) -> bool {
        p[0] >= self.x && p[1] >= self.y && p[0] <= self.x + self.w && p[1] <= self.y + self.h
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn union(self, other: Rect) -> Rect {
        let minx = self.x.min(other.x);
        let miny = self.y.min(other.y);
        let maxx = (self.x + self.w).max(other.x + other.w);
        let maxy = (self.y + self.h).max(other.y + other.h);
        Rect { x: minx, y: miny, w: maxx - minx, h: maxy - miny }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = [f32; 2]>>(points: I) -> Option<Rect> {
        let mut minx = f32::INFINITY;
        let mut miny = f32::INFINITY;
        let mut maxx = f32::NEG_INFINITY;
        let mut maxy = f32::NEG_INFINITY;
        let mut any = false;
        for p in points {
            minx = minx.min(p[0]);
            miny = miny.min(p[1]);
            maxx = maxx.max(p[0]);
            maxy = maxy.max(p[1]);
            any = true;
        }
        if any {
            Some(Rect { x: minx, y: miny, w: (maxx - minx).max(0.0), h: (maxy - miny).max(0.0) })
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoundedRadii {
    pub tl: f32,
    pub tr: f32,
    pub br: f32,
    pub bl: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedRect {
    pub rect: Rect,
    pub radii: RoundedRadii,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    /// Whether a winding number counts as inside under this rule.
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}
