//! A small interactive scene: a polar surface, a rhombohedron, an eye and
//! the coordinate arrows.
//!
//! Drag with the left button to rotate, right button to translate, scroll
//! to zoom. Ctrl+H prints the full binding list.

use mathplot::{
    keep_open, BuiltinFont, ColourMapType, EyeVisual, PolarVisual, RhomboVisual, Vec3, Visual,
    VisualModel, VisualTextModel,
};

fn main() -> mathplot::Result<()> {
    mathplot::init();

    let mut visual = Visual::new("graph3d", 1024, 768);
    visual.options.show_coord_arrows = true;
    visual.options.bg_colour = Vec3::new(0.95, 0.95, 0.97);

    // A sombrero on a polar grid.
    let mut polar = PolarVisual::new(Vec3::ZERO, 1.2, 24, 48);
    let data: Vec<f32> = polar
        .grid_coords()
        .iter()
        .map(|c| {
            let r = (c.x * c.x + c.y * c.y).sqrt() * 8.0;
            if r < 1e-6 { 1.0 } else { r.sin() / r }
        })
        .collect();
    polar.set_scalar_data(data);
    polar.data.set_colour_map(ColourMapType::Viridis);
    polar.finalize()?;
    visual.add_model(Box::new(polar));

    let mut rhombo = RhomboVisual::new(
        Vec3::new(-2.2, 0.0, 0.0),
        Vec3::X * 0.8,
        Vec3::new(0.25, 0.8, 0.0),
        Vec3::Z * 0.8,
        Vec3::new(0.8, 0.4, 0.1),
    );
    rhombo.finalize()?;
    visual.add_model(Box::new(rhombo));

    let mut eye = EyeVisual::new(Vec3::new(2.2, 0.0, 0.0), 0.5, Vec3::new(-0.6, 0.2, 1.0));
    eye.finalize()?;
    let index = visual.add_model(Box::new(eye));

    let mut label = VisualTextModel::new("watching", 0.12, 24, Vec3::ZERO);
    label.layout(&BuiltinFont, true);
    visual.add_label(label, Vec3::new(2.2, 0.8, 0.0));
    log::info!("eye model at index {index}; press Ctrl+H for bindings");

    keep_open(visual)?;
    Ok(())
}
