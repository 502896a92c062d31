/// Drawing surface consumed by the rendering helpers. Horizontal pixels
/// are buffer/envelope column indices; the embedding application maps the
/// commands onto whatever rendering technology it uses.
pub trait DrawSurface {
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn stroke(&mut self);
}

fn column_y(v: f32, height: f32, range: (f32, f32)) -> f32 {
    let scale = height / (range.1 - range.0);
    (range.1 - v) * scale
}

/// Polyline of `data`, one column per entry. The first range bound draws
/// at the bottom, the second at the top.
pub fn render_wave(surface: &mut dyn DrawSurface, data: &[f32], height: f32, range: (f32, f32)) {
    if data.is_empty() || range.1 <= range.0 {
        return;
    }
    surface.move_to(0.0, column_y(data[0], height, range));
    for (i, &v) in data.iter().enumerate().skip(1) {
        surface.line_to(i as f32, column_y(v, height, range));
    }
    surface.stroke();
}

/// One full-height vertical tick per marker column.
pub fn render_markers(surface: &mut dyn DrawSurface, columns: &[f32], height: f32) {
    for &x in columns {
        surface.move_to(x, 0.0);
        surface.line_to(x, height);
        surface.stroke();
    }
}

/// Repaint the columns a freehand segment touched. Clears two columns of
/// margin on each side and redraws through the neighbors so the joins stay
/// continuous.
pub fn repaint_span(
    surface: &mut dyn DrawSurface,
    data: &[f32],
    height: f32,
    range: (f32, f32),
    start: usize,
    length: usize,
) {
    if data.is_empty() || range.1 <= range.0 {
        return;
    }
    let from = start.saturating_sub(2).min(data.len() - 1);
    let to = (start + length + 1).min(data.len() - 1);
    surface.clear_rect(start as f32 - 2.0, 0.0, length as f32 + 3.0, height);
    surface.move_to(from as f32, column_y(data[from], height, range));
    for i in from + 1..=to {
        surface.line_to(i as f32, column_y(data[i], height, range));
    }
    surface.stroke();
}

/// Headless surface that records the command stream instead of
/// rasterizing. Embedders can replay it against a real canvas; the tests
/// assert on it directly.
#[derive(Clone, Debug, Default)]
pub struct CommandLog {
    pub commands: Vec<SurfaceCommand>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceCommand {
    ClearRect { x: f32, y: f32, w: f32, h: f32 },
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    Stroke,
}

impl DrawSurface for CommandLog {
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(SurfaceCommand::ClearRect { x, y, w, h });
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(SurfaceCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(SurfaceCommand::LineTo { x, y });
    }

    fn stroke(&mut self) {
        self.commands.push(SurfaceCommand::Stroke);
    }
}
