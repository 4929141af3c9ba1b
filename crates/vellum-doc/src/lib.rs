//! vellum-doc: the portable scene document.
//!
//! A document is a root id plus a flat map of typed nodes that reference
//! their children by id. Loading never fails on structural problems such as
//! dangling children or cycles; those are reported as [`DocumentIssue`]s and
//! skipped by consumers.

pub mod document;
pub mod schema;
pub mod style;

pub use document::{Assets, Document, DocumentIssue};
pub use schema::{
    CornerRadius, FontRef, FrameData, Geometry, GroupData, NodeId, NodeKind, RectangleData,
    SceneNode, Size, SvgPaths, TextAlign, TextData, TextMetric, VectorData, VectorKind,
    WindingRule,
};
pub use style::{
    Blur, DropShadow, Effect, GradientFill, GradientStop, ImageFill, LineCap, LineJoin, Paint,
    Rgba, SolidFill, StrokePaint, Style,
};
