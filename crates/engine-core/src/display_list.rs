use std::rc::Rc;

use crate::backend::{GradientSpec, PaintStyle, ParagraphSpec};
use crate::path::PathCommand;
use crate::scene::*;
use crate::text_layout::WrappedText;

/// Path handle produced by the recording backend.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedPath {
    pub data: String,
    pub commands: Rc<[PathCommand]>,
    pub fill_rule: FillRule,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedShader {
    pub gradient: Rc<GradientSpec>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedPaint {
    pub style: PaintStyle,
    pub color: ColorLinPremul,
    pub shader: Option<RecordedShader>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedParagraph {
    pub spec: Rc<ParagraphSpec>,
    pub max_width: f32,
    pub layout: Rc<WrappedText>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Clear,
    Save,
    Restore,
    /// Transform after concatenation.
    Concat(Transform2D),
    ClipRect { rect: Rect, transform: Transform2D },
    DrawPath { path: RecordedPath, paint: RecordedPaint, transform: Transform2D },
    DrawRect { rect: Rect, paint: RecordedPaint, transform: Transform2D },
    DrawRoundedRect { rrect: RoundedRect, paint: RecordedPaint, transform: Transform2D },
    DrawTextLine {
        text: String,
        pos: [f32; 2],
        size: f32,
        color: ColorLinPremul,
        transform: Transform2D,
    },
    Present,
}

impl Command {
    /// Whether the command puts pixels on the surface.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Command::DrawPath { .. }
                | Command::DrawRect { .. }
                | Command::DrawRoundedRect { .. }
                | Command::DrawTextLine { .. }
        )
    }
}

/// How many primitives of each kind the backend was asked to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub paths: usize,
    pub paints: usize,
    pub shaders: usize,
    pub paragraphs: usize,
}

#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    pub commands: Vec<Command>,
    pub stats: BuildStats,
}

impl DisplayList {
    pub fn draw_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| c.is_draw())
    }

    /// Commands recorded since the last `Clear`.
    pub fn last_frame(&self) -> &[Command] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, Command::Clear))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }
}
