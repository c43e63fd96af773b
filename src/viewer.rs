//! Interactive tree explorer and one-shot printer.

use crate::braille::{downsample, BrailleGrid};
use crate::config::{CellMetrics, Control, Layout, PrintConfig, TreeParams, ViewConfig};
use crate::controls::{ControlPanel, PanelAction};
use crate::fractal;
use crate::help::show_help_modal;
use crate::rotation::{self, Ticker};
use crate::surface::{DrawOp, PixelSurface, Recorder};
use crate::terminal::Terminal;
use crossterm::style::Color;
use std::io;
use std::time::{Duration, Instant};

const HELP: &str = "\
FRACTAL TREE
─────────────────────────
Up/Down     Select control
Left/Right  Adjust value
Shift+←/→   Adjust by 5 steps
Home/End    Jump to min/max
r/Space     Toggle rotation
q/Esc       Quit
?           Close help";

/// Columns reserved for the control panel
const PANEL_COLS: u16 = 42;
/// Narrowest tree area worth keeping the panel for
const MIN_TREE_COLS: u16 = 20;
/// Upper bound on how long the loop blocks waiting for input
const IDLE_POLL: Duration = Duration::from_millis(250);
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Tree raster plus the braille grid produced from it
struct Scene {
    layout: Layout,
    cells: CellMetrics,
    surface: PixelSurface,
    grid: BrailleGrid,
    segments: u64,
}

impl Scene {
    fn new(layout: Layout, cells: CellMetrics) -> Self {
        Self {
            layout,
            cells,
            surface: PixelSurface::new(0, 0),
            grid: BrailleGrid::empty(),
            segments: 0,
        }
    }

    /// Re-render the whole tree for a `cols` x `rows` cell area
    fn redraw(&mut self, params: &TreeParams, cols: u16, rows: u16) {
        self.surface
            .resize(cols as u32 * self.cells.width_px, rows as u32 * self.cells.height_px);
        self.segments = fractal::render(&mut self.surface, params, &self.layout);
        self.grid = downsample(self.surface.image(), cols, rows, self.cells, self.layout.background);
    }

    /// Copy the braille grid into the terminal buffer at column `x0`
    fn blit(&self, term: &mut Terminal, x0: u16) {
        let fg = Color::from(self.layout.line_color);
        let bg = Color::from(self.layout.background);
        term.fill_bg(x0, 0, self.grid.cols, self.grid.rows, bg);
        for (col, row, ch) in self.grid.glyphs() {
            term.set((x0 + col) as i32, row as i32, ch, Some(fg), Some(bg), false);
        }
    }
}

/// Width of the panel for a terminal `width` columns wide
fn panel_cols(width: u16) -> u16 {
    if width >= PANEL_COLS + MIN_TREE_COLS {
        PANEL_COLS
    } else {
        0
    }
}

fn draw_panel(term: &mut Terminal, panel: &ControlPanel, params: &TreeParams, rotating: bool, segments: u64) {
    let selected = panel.selected();
    term.set_str(1, 0, "FRACTAL TREE", Some(Color::White), None, true);
    for (i, (line, control)) in panel
        .lines(params)
        .iter()
        .zip(Control::ALL)
        .enumerate()
    {
        let bold = control == selected;
        let fg = if bold { Color::White } else { Color::Grey };
        term.set_str(0, 2 + i as i32, line, Some(fg), None, bold);
    }

    let rotation = if rotating {
        format!("  Rotate  on  ({:.0}°)", params.rotation_angle)
    } else {
        "  Rotate  off".to_string()
    };
    term.set_str(0, 8, &rotation, Some(Color::Grey), None, false);
    term.set_str(0, 9, &format!("  Segments  {}", segments), Some(Color::Grey), None, false);
    term.set_str(0, 11, "  ? help   q quit", Some(Color::DarkGrey), None, false);
}

/// Layout for the current rotation state. A paused tree keeps the rotating
/// base until its angle is back at 0 so it doesn't jump.
fn scene_layout(base: Layout, running: bool, rotation_angle: f64) -> Layout {
    if running || rotation_angle != 0.0 {
        base.rotating()
    } else {
        base
    }
}

/// Rebuild the terminal buffer from the scene and panel state
fn compose(term: &mut Terminal, scene: &Scene, panel: &ControlPanel, params: &TreeParams, rotating: bool) {
    let (width, _) = term.size();
    term.clear();
    let x0 = panel_cols(width);
    if x0 > 0 {
        draw_panel(term, panel, params, rotating, scene.segments);
    }
    scene.blit(term, x0);
}

/// Run the interactive viewer until the user quits
pub fn run(config: ViewConfig) -> io::Result<()> {
    let mut term = Terminal::new(true)?;
    term.clear_screen()?;

    let mut params = config.params;
    let mut panel = ControlPanel::default();
    let mut scene = Scene::new(scene_layout(config.layout, config.rotate, params.rotation_angle), config.cells);
    let period = rotation::tick_period(config.tick);
    let mut ticker = if config.rotate {
        Ticker::start(period, Instant::now())
    } else {
        Ticker::stopped(period)
    };

    let mut tree_dirty = true;
    let mut panel_dirty = true;

    loop {
        // Check for terminal resize
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());
        if (width, height) != term.size() {
            log::debug!("terminal resized to {}x{}", width, height);
            term.resize(width, height);
            term.clear_screen()?;
            tree_dirty = true;
        }

        let (next, ticked) = rotation::apply_ticks(params, ticker.poll(Instant::now()));
        params = next;
        tree_dirty |= ticked;

        if tree_dirty {
            let tree_cols = width.saturating_sub(panel_cols(width));
            scene.redraw(&params, tree_cols, height);
            tree_dirty = false;
            panel_dirty = true;
        }
        if panel_dirty {
            compose(&mut term, &scene, &panel, &params, ticker.is_running());
            term.render()?;
            panel_dirty = false;
        }

        let timeout = ticker
            .remaining(Instant::now())
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL));
        let Some((code, mods)) = term.poll_key(timeout)? else {
            continue;
        };

        match panel.handle_key(code, mods, &params) {
            PanelAction::Quit => break,
            PanelAction::Help => {
                if show_help_modal(&mut term, HELP)? {
                    break;
                }
            }
            PanelAction::ToggleRotate => {
                if ticker.is_running() {
                    ticker.cancel();
                } else {
                    ticker.resume(Instant::now());
                }
                log::debug!("rotation {}", if ticker.is_running() { "on" } else { "off" });
                scene.layout = scene_layout(config.layout, ticker.is_running(), params.rotation_angle);
                tree_dirty = true;
            }
            PanelAction::Select => panel_dirty = true,
            PanelAction::Update(next) => {
                params = next;
                tree_dirty = true;
            }
            PanelAction::Ignored => {}
        }
    }

    ticker.cancel();
    Ok(())
}

/// Render a single frame into an off-screen terminal buffer
fn print_frame(config: &PrintConfig, cols: u16, rows: u16) -> Terminal {
    let mut term = Terminal::headless(cols, rows);
    let mut scene = Scene::new(config.layout, config.cells);
    scene.redraw(&config.params, cols, rows);
    scene.blit(&mut term, 0);
    term
}

/// Segment statistics of one render, gathered on a recording surface
fn frame_stats(config: &PrintConfig, cols: u16, rows: u16) -> String {
    let (w, h) = (cols as u32 * config.cells.width_px, rows as u32 * config.cells.height_px);
    let mut rec = Recorder::new(w, h);
    let drawn = fractal::render(&mut rec, &config.params, &config.layout);
    let expected = fractal::expected_segments(config.params.branch_propagation, config.params.max_depth);

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for op in rec.lines() {
        if let DrawOp::Line { x1, y1, x2, y2, .. } = *op {
            min_x = min_x.min(x1).min(x2);
            max_x = max_x.max(x1).max(x2);
            min_y = min_y.min(y1).min(y2);
            max_y = max_y.max(y1).max(y2);
        }
    }

    let mut out = format!("surface   {}x{} px\nsegments  {} (expected {})\n", w, h, drawn, expected);
    if drawn > 0 {
        out.push_str(&format!(
            "extent    x {:.1}..{:.1}  y {:.1}..{:.1}\n",
            min_x, max_x, min_y, max_y
        ));
    }
    out
}

/// Print one frame (or its statistics) to stdout and exit
pub fn print(config: PrintConfig) -> io::Result<()> {
    let detected = crossterm::terminal::size().unwrap_or_else(|e| {
        log::info!("no terminal size available ({}), using {}x{}", e, FALLBACK_SIZE.0, FALLBACK_SIZE.1);
        FALLBACK_SIZE
    });
    let cols = config.cols.unwrap_or(detected.0).max(1);
    let rows = config.rows.unwrap_or(detected.1).max(1);

    if config.stats {
        print!("{}", frame_stats(&config, cols, rows));
        return Ok(());
    }
    print_frame(&config, cols, rows).print_to_stdout()
}
