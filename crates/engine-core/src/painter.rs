use std::rc::Rc;

use crate::backend::{DrawBackend, GradientSpec, PaintStyle, ParagraphSpec};
use crate::display_list::{
    Command, DisplayList, RecordedPaint, RecordedParagraph, RecordedPath, RecordedShader,
};
use crate::path::parse_path;
use crate::scene::*;
use crate::text_layout::{render_wrapped_text, wrap_text_fast};

/// Recording backend: turns every backend call into a display-list command,
/// tracking the transform stack so each draw carries its world transform.
pub struct Painter {
    list: DisplayList,
    transform_stack: Vec<Transform2D>,
    clip_depth: usize,
    /// Clip depth at each open `save`.
    saved_clip_depths: Vec<usize>,
}

impl Default for Painter {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter {
    pub fn new() -> Self {
        Self {
            list: DisplayList::default(),
            transform_stack: vec![Transform2D::identity()],
            clip_depth: 0,
            saved_clip_depths: Vec::new(),
        }
    }

    pub fn current_transform(&self) -> Transform2D {
        self.transform_stack
            .last()
            .copied()
            .unwrap_or_else(Transform2D::identity)
    }

    /// Number of active clips in the current save scope chain.
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    /// Get a reference to the display list
    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    pub fn finish(self) -> DisplayList {
        self.list
    }
}

impl DrawBackend for Painter {
    type Path = RecordedPath;
    type Paint = RecordedPaint;
    type Shader = RecordedShader;
    type Paragraph = RecordedParagraph;

    fn make_path(&mut self, data: &str) -> RecordedPath {
        self.list.stats.paths += 1;
        RecordedPath {
            data: data.to_string(),
            commands: parse_path(data).into(),
            fill_rule: FillRule::NonZero,
        }
    }

    fn set_fill_rule(&mut self, path: &mut RecordedPath, rule: FillRule) {
        path.fill_rule = rule;
    }

    fn make_paint(
        &mut self,
        style: &PaintStyle,
        color: ColorLinPremul,
        shader: Option<&RecordedShader>,
    ) -> RecordedPaint {
        self.list.stats.paints += 1;
        RecordedPaint {
            style: style.clone(),
            color,
            shader: shader.cloned(),
        }
    }

    fn make_gradient_shader(&mut self, gradient: &GradientSpec) -> RecordedShader {
        self.list.stats.shaders += 1;
        RecordedShader {
            gradient: Rc::new(gradient.clone()),
        }
    }

    fn layout_paragraph(&mut self, spec: &ParagraphSpec, max_width: f32) -> RecordedParagraph {
        self.list.stats.paragraphs += 1;
        let layout = wrap_text_fast(
            &spec.text,
            max_width,
            spec.font_size,
            spec.line_height,
            spec.letter_spacing,
        );
        RecordedParagraph {
            spec: Rc::new(spec.clone()),
            max_width,
            layout: Rc::new(layout),
        }
    }

    fn clear(&mut self) {
        self.transform_stack.clear();
        self.transform_stack.push(Transform2D::identity());
        self.clip_depth = 0;
        self.saved_clip_depths.clear();
        self.list.commands.push(Command::Clear);
    }

    fn save(&mut self) {
        let t = self.current_transform();
        self.transform_stack.push(t);
        self.saved_clip_depths.push(self.clip_depth);
        self.list.commands.push(Command::Save);
    }

    fn restore(&mut self) {
        // The base entry is never popped.
        if self.transform_stack.len() > 1 {
            let _ = self.transform_stack.pop();
        }
        if let Some(depth) = self.saved_clip_depths.pop() {
            self.clip_depth = depth;
        }
        self.list.commands.push(Command::Restore);
    }

    fn concat(&mut self, t: Transform2D) {
        // Compose with current transform so nested pushes multiply.
        let composed = self.current_transform().concat(t);
        if let Some(top) = self.transform_stack.last_mut() {
            *top = composed;
        }
        self.list.commands.push(Command::Concat(composed));
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.clip_depth += 1;
        let transform = self.current_transform();
        self.list.commands.push(Command::ClipRect { rect, transform });
    }

    fn draw_path(&mut self, path: &RecordedPath, paint: &RecordedPaint) {
        let transform = self.current_transform();
        self.list.commands.push(Command::DrawPath {
            path: path.clone(),
            paint: paint.clone(),
            transform,
        });
    }

    fn draw_rect(&mut self, rect: Rect, paint: &RecordedPaint) {
        let transform = self.current_transform();
        self.list.commands.push(Command::DrawRect {
            rect,
            paint: paint.clone(),
            transform,
        });
    }

    fn draw_rounded_rect(&mut self, rrect: RoundedRect, paint: &RecordedPaint) {
        let transform = self.current_transform();
        self.list.commands.push(Command::DrawRoundedRect {
            rrect,
            paint: paint.clone(),
            transform,
        });
    }

    fn draw_paragraph(&mut self, paragraph: &RecordedParagraph, origin: [f32; 2]) {
        let transform = self.current_transform();
        let size = paragraph.spec.font_size;
        let color = paragraph.spec.color;
        let commands = &mut self.list.commands;
        render_wrapped_text(&paragraph.layout, origin, |line, pos| {
            commands.push(Command::DrawTextLine {
                text: line.to_string(),
                pos,
                size,
                color,
                transform,
            });
        });
    }

    fn present(&mut self) {
        self.list.commands.push(Command::Present);
    }
}
