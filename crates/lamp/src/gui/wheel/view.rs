use super::scene::{Swatch, WheelScene};
use cairo::{Context, Format, ImageSurface};
use std::f64::consts::PI;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("Failed to write PNG: {0}")]
    Png(#[from] cairo::IoError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scene of size {0}x{1} cannot be rasterized")]
    EmptySurface(f64, f64),
}

fn draw_swatch(cr: &Context, swatch: &Swatch) -> Result<(), cairo::Error> {
    let (r, g, b, a) = swatch.color.to_srgba().into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.set_line_width(swatch.line_width);
    cr.arc(swatch.center.x, swatch.center.y, swatch.radius, 0.0, 2.0 * PI);
    cr.fill_preserve()?;
    cr.stroke()
}

/// Paints `scene` rotated by `rotation` radians around its center.
pub fn draw(cr: &Context, scene: &WheelScene, rotation: f64) -> Result<(), cairo::Error> {
    cr.save()?;
    cr.translate(scene.center.x, scene.center.y);
    cr.rotate(rotation);
    cr.translate(-scene.center.x, -scene.center.y);
    for swatch in &scene.swatches {
        draw_swatch(cr, swatch)?;
    }
    cr.restore()
}

pub fn write_png(scene: &WheelScene, rotation: f64, path: &Path) -> Result<(), RenderError> {
    let (width, height) = (scene.size.width.ceil(), scene.size.height.ceil());
    if !(width >= 1.0 && height >= 1.0) {
        return Err(RenderError::EmptySurface(scene.size.width, scene.size.height));
    }
    let surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
    {
        let cr = Context::new(&surface)?;
        draw(&cr, scene, rotation)?;
    }
    let mut file = fs_err::File::create(path)?;
    surface.write_to_png(&mut file)?;
    log::info!("Wrote {}x{} wheel to {}", width, height, path.display());
    Ok(())
}
