//! 2D canvas sink (WASM only)

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::colors;
use super::{RenderSink, Snapshot};
use crate::consts::*;
use crate::sim::{Actor, ObstacleKind};

/// Barrel length from the tank center
const BARREL_LENGTH: f64 = 24.0;

pub struct CanvasSink {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSink {
    /// Size the canvas to the arena and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        canvas.set_width(ARENA_WIDTH as u32);
        canvas.set_height(ARENA_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    fn draw_grid(&self) {
        let c = &self.ctx;
        let (w, h) = (f64::from(ARENA_WIDTH), f64::from(ARENA_HEIGHT));
        c.set_fill_style_str(colors::BACKGROUND);
        c.fill_rect(0.0, 0.0, w, h);
        c.set_stroke_style_str(colors::GRID);
        c.set_line_width(1.0);

        let tile = f64::from(TILE);
        let mut x = 0.0;
        while x < w {
            c.begin_path();
            c.move_to(x, 0.0);
            c.line_to(x, h);
            c.stroke();
            x += tile;
        }
        let mut y = 0.0;
        while y < h {
            c.begin_path();
            c.move_to(0.0, y);
            c.line_to(w, y);
            c.stroke();
            y += tile;
        }
    }

    fn draw_tank(&self, tank: &Actor, color: &str) {
        let c = &self.ctx;
        let (x, y) = (f64::from(tank.pos.x), f64::from(tank.pos.y));
        let (w, h) = (f64::from(tank.size.x), f64::from(tank.size.y));
        c.set_fill_style_str(color);
        c.set_stroke_style_str(colors::OUTLINE);
        c.set_line_width(2.0);
        c.fill_rect(x, y, w, h);
        c.stroke_rect(x, y, w, h);

        let center = tank.center();
        let (cx, cy) = (f64::from(center.x), f64::from(center.y));
        c.begin_path();
        c.move_to(cx, cy);
        c.line_to(
            cx + f64::from(tank.facing.x) * BARREL_LENGTH,
            cy + f64::from(tank.facing.y) * BARREL_LENGTH,
        );
        c.set_line_width(6.0);
        c.set_stroke_style_str(color);
        c.stroke();
    }
}

impl RenderSink for CanvasSink {
    fn draw(&mut self, frame: &Snapshot<'_>) {
        self.draw_grid();
        let c = &self.ctx;

        for o in frame.obstacles {
            c.set_fill_style_str(match o.kind {
                ObstacleKind::Brick => colors::BRICK,
                ObstacleKind::Steel => colors::STEEL,
            });
            c.fill_rect(
                f64::from(o.rect.x),
                f64::from(o.rect.y),
                f64::from(o.rect.w),
                f64::from(o.rect.h),
            );
        }

        c.set_fill_style_str(colors::PROJECTILE);
        for p in frame.projectiles {
            c.begin_path();
            if c
                .arc(f64::from(p.pos.x), f64::from(p.pos.y), f64::from(p.radius), 0.0, TAU)
                .is_ok()
            {
                c.fill();
            }
        }

        for e in frame.enemies {
            self.draw_tank(e, colors::ENEMY);
        }
        if frame.player_visible {
            self.draw_tank(frame.player, colors::PLAYER);
        }
    }
}
