//! SceneView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{ChallengeSnapshot, SessionSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::SessionPhase;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const SKY: Rgb = Rgb::new(12, 16, 30);
const GROUND: Rgb = Rgb::new(18, 40, 26);
const PANEL: Rgb = Rgb::new(15, 23, 42);
const AMBER: Rgb = Rgb::new(251, 191, 36);
const CYAN: Rgb = Rgb::new(34, 211, 238);
const TEXT: Rgb = Rgb::new(226, 232, 240);
const MUTED: Rgb = Rgb::new(148, 163, 184);
const DAMAGED: Rgb = Rgb::new(239, 68, 68);
const REPAIRED: Rgb = Rgb::new(34, 197, 94);
const SMOKE: Rgb = Rgb::new(156, 163, 175);

/// Rows reserved above the scene for the HUD.
const HUD_ROWS: u16 = 2;
/// Rows reserved below the scene for the progress bar.
const FOOTER_ROWS: u16 = 2;

/// Terminal renderer for the repair scene, its HUD and dialogs.
#[derive(Debug, Clone, Copy)]
pub struct SceneView {
    dialog_width: u16,
}

impl Default for SceneView {
    fn default() -> Self {
        Self { dialog_width: 56 }
    }
}

impl SceneView {
    pub fn new(dialog_width: u16) -> Self {
        Self { dialog_width }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(TEXT, SKY).into_cell(' '));
        if viewport.width < 20 || viewport.height < 8 {
            fb.put_str(0, 0, "window too small", CellStyle::default());
            return;
        }

        self.draw_backdrop(fb, viewport);
        self.draw_hud(fb, snap, viewport);
        self.draw_buildings(fb, snap, viewport);
        self.draw_progress(fb, snap, viewport);

        if let Some(challenge) = &snap.challenge {
            self.draw_question_dialog(fb, challenge, viewport);
        } else if snap.phase == SessionPhase::NotStarted {
            self.draw_start_dialog(fb, viewport);
        } else if snap.phase == SessionPhase::Complete {
            self.draw_complete_dialog(fb, snap, viewport);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn scene_rows(&self, viewport: Viewport) -> (u16, u16) {
        let top = HUD_ROWS;
        let height = viewport.height.saturating_sub(HUD_ROWS + FOOTER_ROWS);
        (top, height)
    }

    fn draw_backdrop(&self, fb: &mut FrameBuffer, viewport: Viewport) {
        let (top, height) = self.scene_rows(viewport);
        // Sky takes the top quarter of the scene; the rest is ground.
        let horizon = top + height / 4;
        fb.fill_rect(
            0,
            horizon,
            viewport.width,
            viewport.height - horizon,
            ' ',
            CellStyle::new(TEXT, GROUND),
        );
        for i in 0..viewport.width / 7 {
            let x = (i * 7 + (i * 13) % 5) % viewport.width;
            let y = top + (i % 3).min(horizon.saturating_sub(top + 1));
            fb.put_char(x, y, '.', CellStyle::new(MUTED, SKY).dim());
        }
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        let panel = CellStyle::new(TEXT, PANEL);
        fb.fill_rect(0, 0, viewport.width, 1, ' ', panel);
        fb.put_str(1, 0, "Planet Repair", CellStyle::new(AMBER, PANEL).bold());

        let repaired = format!(
            "Repaired: {}/{}",
            snap.repaired_count(),
            snap.building_count
        );
        let clock = snap.formatted_clock();
        let right = format!("{}   {}", repaired, clock);
        let x = viewport.width.saturating_sub(right.chars().count() as u16 + 1);
        fb.put_str(x, 0, &right, CellStyle::new(AMBER, PANEL).bold());
    }

    fn draw_buildings(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        let (top, height) = self.scene_rows(viewport);
        let usable_w = viewport.width.saturating_sub(6);

        for (n, b) in snap.buildings.iter().enumerate() {
            let cx = 3 + (b.x.clamp(0.0, 1.0) * usable_w as f32) as u16;
            let cy = top + (b.y.clamp(0.0, 1.0) * height.saturating_sub(3) as f32) as u16;
            let x = cx.saturating_sub(2);

            let (body, marker) = if b.repaired {
                (CellStyle::new(REPAIRED, GROUND).bold(), '●')
            } else {
                (CellStyle::new(DAMAGED, GROUND), '○')
            };

            if !b.repaired {
                let smoke = CellStyle::new(SMOKE, GROUND).dim();
                fb.put_str(x, cy.saturating_sub(1), " ~ ~ ", smoke);
            }
            let label = format!("[{}]", n + 1);
            fb.put_str(x, cy, &format!("{:^5}", label), CellStyle::new(TEXT, GROUND).bold());
            let glyph = if b.repaired { "█▀▀█" } else { "▓░▒▓" };
            fb.put_str(x, cy + 1, &format!("{:^5}", glyph), body);
            fb.put_char(cx, cy + 2, marker, body);
        }
    }

    fn draw_progress(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        let y = viewport.height - FOOTER_ROWS;
        let label = CellStyle::new(AMBER, GROUND).dim();
        fb.put_str(1, y, "Repair Progress", label);
        let pct = format!("{}%", snap.progress_percent());
        fb.put_str(
            viewport.width.saturating_sub(pct.len() as u16 + 1),
            y,
            &pct,
            label,
        );

        let bar_w = viewport.width.saturating_sub(2);
        let filled = (bar_w as u32 * snap.progress_percent() / 100) as u16;
        fb.fill_rect(1, y + 1, bar_w, 1, '░', CellStyle::new(MUTED, GROUND).dim());
        fb.fill_rect(1, y + 1, filled, 1, '█', CellStyle::new(AMBER, GROUND));
    }

    /// Box with a border; returns the inner origin and width.
    fn draw_dialog_frame(
        &self,
        fb: &mut FrameBuffer,
        viewport: Viewport,
        h: u16,
        accent: Rgb,
    ) -> (u16, u16, u16) {
        let w = self.dialog_width.min(viewport.width.saturating_sub(2)).max(12);
        let h = h.min(viewport.height.saturating_sub(2));
        let x = viewport.width.saturating_sub(w) / 2;
        let y = viewport.height.saturating_sub(h) / 2;

        let border = CellStyle::new(accent, Rgb::new(0, 0, 0));
        fb.fill_rect(x, y, w, h, ' ', CellStyle::new(TEXT, Rgb::new(0, 0, 0)));
        fb.put_char(x, y, '┌', border);
        fb.put_char(x + w - 1, y, '┐', border);
        fb.put_char(x, y + h - 1, '└', border);
        fb.put_char(x + w - 1, y + h - 1, '┘', border);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', border);
            fb.put_char(x + dx, y + h - 1, '─', border);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', border);
            fb.put_char(x + w - 1, y + dy, '│', border);
        }
        (x + 2, y + 1, w - 4)
    }

    fn draw_start_dialog(&self, fb: &mut FrameBuffer, viewport: Viewport) {
        let (x, mut y, w) = self.draw_dialog_frame(fb, viewport, 9, AMBER);
        let bg = Rgb::new(0, 0, 0);
        fb.put_str_centered(x, w, y + 1, "Planet Repair", CellStyle::new(AMBER, bg).bold());
        y += 3;
        for line in wrap(
            "Answer 3 questions correctly to repair a building. Repair them all as fast as you can.",
            w as usize,
        ) {
            fb.put_str_centered(x, w, y, &line, CellStyle::new(MUTED, bg));
            y += 1;
        }
        fb.put_str_centered(
            x,
            w,
            y + 1,
            "[Enter] Start   [1-9] Pick a building",
            CellStyle::new(TEXT, bg).bold(),
        );
    }

    fn draw_complete_dialog(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        let (x, y, w) = self.draw_dialog_frame(fb, viewport, 9, AMBER);
        let bg = Rgb::new(0, 0, 0);
        fb.put_str_centered(x, w, y + 1, "Planet Restored!", CellStyle::new(AMBER, bg).bold());
        fb.put_str_centered(
            x,
            w,
            y + 3,
            &format!("All {} buildings repaired", snap.building_count),
            CellStyle::new(MUTED, bg),
        );
        fb.put_str_centered(
            x,
            w,
            y + 4,
            &format!("Time: {}", snap.formatted_clock()),
            CellStyle::new(AMBER, bg).bold(),
        );
        fb.put_str_centered(x, w, y + 6, "[Enter] Play Again", CellStyle::new(TEXT, bg).bold());
    }

    fn draw_question_dialog(&self, fb: &mut FrameBuffer, c: &ChallengeSnapshot, viewport: Viewport) {
        let prompt_lines = wrap(&c.prompt, self.dialog_width.saturating_sub(6) as usize);
        let h = 10 + prompt_lines.len() as u16 + c.options.len() as u16;
        let (x, mut y, w) = self.draw_dialog_frame(fb, viewport, h, CYAN);
        let bg = Rgb::new(0, 0, 0);
        let cyan = CellStyle::new(CYAN, bg);

        fb.put_str(x, y, "[SYS] Building Repair Terminal", cyan.bold());
        let counter = format!("Question {}/{}", c.current_index + 1, c.question_count);
        fb.put_str(x + w.saturating_sub(counter.len() as u16), y, &counter, cyan);
        y += 2;

        for line in &prompt_lines {
            fb.put_str(x, y, line, CellStyle::new(TEXT, bg));
            y += 1;
        }
        y += 1;

        for (i, option) in c.options.iter().enumerate() {
            let style = match (c.selected_answer.as_deref(), c.answer_correct) {
                (Some(sel), Some(true)) if sel == option => CellStyle::new(REPAIRED, bg).bold(),
                (Some(sel), Some(false)) if sel == option => CellStyle::new(DAMAGED, bg).bold(),
                (Some(_), _) => CellStyle::new(MUTED, bg).dim(),
                _ => CellStyle::new(TEXT, bg),
            };
            fb.put_str(x, y, &format!("{}> {}", i + 1, option), style);
            y += 1;
        }
        y += 1;

        let status = format!("PROCESS STATUS: {}%", c.progress_percent());
        fb.put_str(x, y, &status, cyan.dim());
        y += 1;
        let bar_w = w.saturating_sub(2);
        let filled = (bar_w as u32 * c.progress_percent() / 100) as u16;
        fb.put_char(x, y, '[', cyan);
        fb.fill_rect(x + 1, y, filled, 1, '█', cyan);
        fb.put_char(x + 1 + bar_w, y, ']', cyan);
        y += 1;

        let footer = format!("BUILDING ID: {}   [Esc] close", c.building);
        fb.put_str(x, y + 1, &footer, CellStyle::new(MUTED, bg));
    }
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
        for l in &lines {
            assert!(l.chars().count() <= 10);
        }
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let fb = SceneView::default().render(&SessionSnapshot::default(), Viewport::new(5, 3));
        assert_eq!(fb.width(), 5);
    }
}
