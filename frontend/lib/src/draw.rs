use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, OffscreenCanvas, OffscreenCanvasRenderingContext2d as CanvasContext,
};

use blockfall_core::{Board, COLS, Piece, PieceKind, ROWS};

/// Cell edge length in canvas pixels; the canvas is COLS x ROWS cells.
pub const BLOCK: f64 = 30.;

/// Cell outline and backdrop shade, the page's slate tone.
const EDGE: Color = Color::rgb(0x0f, 0x17, 0x2a);

const fn base_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::rgb(0x60, 0xa5, 0xfa),
        PieceKind::O => Color::rgb(0xfa, 0xcc, 0x15),
        PieceKind::T => Color::rgb(0xa8, 0x55, 0xf7),
        PieceKind::S => Color::rgb(0x22, 0xc5, 0x5e),
        PieceKind::Z => Color::rgb(0xef, 0x44, 0x44),
        PieceKind::J => Color::rgb(0x3b, 0x82, 0xf6),
        PieceKind::L => Color::rgb(0xf9, 0x73, 0x16),
    }
}

pub struct DrawingContext {
    i: SubImage,
    o: SubImage,
    t: SubImage,
    s: SubImage,
    z: SubImage,
    j: SubImage,
    l: SubImage,
    backdrop: SubImage,
}

impl DrawingContext {
    pub fn new() -> Self {
        Self {
            i: Self::make_tile(base_color(PieceKind::I)),
            o: Self::make_tile(base_color(PieceKind::O)),
            t: Self::make_tile(base_color(PieceKind::T)),
            s: Self::make_tile(base_color(PieceKind::S)),
            z: Self::make_tile(base_color(PieceKind::Z)),
            j: Self::make_tile(base_color(PieceKind::J)),
            l: Self::make_tile(base_color(PieceKind::L)),
            backdrop: Self::make_backdrop(),
        }
    }

    fn make_tile(base: Color) -> SubImage {
        SubImage::new(BLOCK as u32, BLOCK as u32, |ctx| {
            let gradient = ctx.create_linear_gradient(0., 0., 0., BLOCK);
            let _ = gradient.add_color_stop(0., &base.lighten(0.25).to_rgb());
            let _ = gradient.add_color_stop(1., &base.to_rgb());

            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(0., 0., BLOCK, BLOCK);

            ctx.set_stroke_style_str(&EDGE.to_rgb());
            ctx.set_line_width(2.);
            ctx.stroke_rect(1., 1., BLOCK - 2., BLOCK - 2.);
        })
    }

    fn make_backdrop() -> SubImage {
        let width = COLS as u32 * BLOCK as u32;
        let height = ROWS as u32 * BLOCK as u32;
        SubImage::new(width, height, |ctx| {
            let width = f64::from(width);
            let height = f64::from(height);
            ctx.set_fill_style_str(&EDGE.darken(0.4).to_rgb());
            ctx.fill_rect(0., 0., width, height);

            ctx.set_stroke_style_str(&EDGE.lighten(0.12).to_rgb());
            ctx.set_line_width(0.5);
            ctx.begin_path();
            for col in 0..=COLS {
                let x = col as f64 * BLOCK;
                ctx.move_to(x, 0.);
                ctx.line_to(x, height);
            }
            for row in 0..=ROWS {
                let y = row as f64 * BLOCK;
                ctx.move_to(0., y);
                ctx.line_to(width, y);
            }
            ctx.stroke();
        })
    }

    /// Repaints the whole frame: backdrop, settled cells, then the
    /// falling piece. Reads state only.
    pub fn draw_frame(&self, ctx: &CanvasRenderingContext2d, board: &Board, piece: &Piece) {
        let _ = ctx.draw_image_with_offscreen_canvas(&self.backdrop.canvas, 0., 0.);
        self.draw_field(ctx, board);
        self.draw_piece(ctx, piece);
    }

    fn tile(&self, kind: PieceKind) -> &SubImage {
        match kind {
            PieceKind::I => &self.i,
            PieceKind::O => &self.o,
            PieceKind::T => &self.t,
            PieceKind::S => &self.s,
            PieceKind::Z => &self.z,
            PieceKind::J => &self.j,
            PieceKind::L => &self.l,
        }
    }

    fn draw_field(&self, ctx: &CanvasRenderingContext2d, board: &Board) {
        for (y, row) in board.grid.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let Some(kind) = cell else {
                    continue;
                };
                let _ = ctx.draw_image_with_offscreen_canvas(
                    &self.tile(*kind).canvas,
                    x as f64 * BLOCK,
                    y as f64 * BLOCK,
                );
            }
        }
    }

    fn draw_piece(&self, ctx: &CanvasRenderingContext2d, piece: &Piece) {
        let image = &self.tile(piece.kind).canvas;
        for (r, row) in piece.grid.iter().enumerate() {
            for (c, filled) in row.iter().enumerate() {
                if *filled {
                    let _ = ctx.draw_image_with_offscreen_canvas(
                        image,
                        f64::from(piece.x + c as i8) * BLOCK,
                        f64::from(piece.y + r as i8) * BLOCK,
                    );
                }
            }
        }
    }
}

struct SubImage {
    canvas: OffscreenCanvas,
}

impl SubImage {
    fn new(width: u32, height: u32, init: impl FnOnce(&mut CanvasContext)) -> Self {
        let canvas = OffscreenCanvas::new(width, height).unwrap();
        let mut context = canvas
            .get_context("2d")
            .unwrap()
            .unwrap()
            .dyn_into::<CanvasContext>()
            .unwrap();
        // remove half-pixel offset
        let _ = context.translate(-0.5, -0.5);
        init(&mut context);
        Self { canvas }
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
struct Color(u8, u8, u8);

impl Color {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    fn to_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn darken(self, amount: f64) -> Self {
        let multi = 1. - amount;
        Self(
            (f64::from(self.0) * multi) as u8,
            (f64::from(self.1) * multi) as u8,
            (f64::from(self.2) * multi) as u8,
        )
    }

    #[inline]
    fn lighten_single(v: u8, amount: f64) -> u8 {
        255 - (f64::from(255 - v) * (1. - amount)) as u8
    }

    fn lighten(self, amount: f64) -> Self {
        Self(
            Self::lighten_single(self.0, amount),
            Self::lighten_single(self.1, amount),
            Self::lighten_single(self.2, amount),
        )
    }
}
