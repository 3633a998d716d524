//! Integration tests for layer compositing
//!
//! These tests drive the public API end to end: building projects, stamping
//! images onto layers, assigning filters and flattening the stack.

use approx::assert_abs_diff_eq;
use collager::{CollageError, Filter, Layer, Pixel, Project};

fn rgb(r: u16, g: u16, b: u16, a: u16) -> Pixel {
    Pixel::rgb(r, g, b, a).expect("channels within 255")
}

/// A height x width grid where every cell is distinct and opaque
fn opaque_grid(height: usize, width: usize, seed: u16) -> Vec<Vec<Pixel>> {
    (0..height)
        .map(|row| {
            (0..width)
                .map(|col| {
                    let i = (row * width + col) as u16;
                    rgb((seed + i * 31) % 256, (seed * 3 + i * 17) % 256, (seed * 7 + i * 11) % 256, 255)
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_pixel_copy_is_independent() {
    for (r, g, b, a) in [(0, 0, 0, 0), (12, 200, 99, 255), (255, 255, 255, 128)] {
        let original = rgb(r, g, b, a);
        let mut copy = original;
        assert_eq!(copy.to_string(), original.to_string());

        copy.apply(Filter::DarkenValue, None);
        assert_eq!(original.rgba(), (r, g, b, a));
    }
}

#[test]
fn test_red_component_on_three_by_two_layer() {
    let grid = opaque_grid(3, 2, 40);
    let mut layer = Layer::new("photo", grid.clone(), 3, 2).unwrap();

    layer.apply_filter(Filter::RedComponent);
    for (row, cells) in layer.rows().enumerate() {
        for (col, pixel) in cells.iter().enumerate() {
            let (r, g, b, a) = pixel.rgba();
            assert_eq!((g, b), (0, 0));
            assert_eq!((r, a), (grid[row][col].rgba().0, 255));
        }
    }
    assert_eq!(layer.pixel_grid_copy(), grid);

    layer.apply_filter(Filter::Normal);
    assert_eq!(layer.display_grid_copy(), grid);
}

#[test]
fn test_add_layer_img_merges_over_background() {
    let mut project = Project::new("stamp", 3, 4).unwrap();
    let before = project.layers()[0].pixel_grid_copy();
    let image = vec![vec![rgb(255, 0, 0, 255), rgb(0, 0, 255, 100)], vec![rgb(0, 0, 0, 0), rgb(9, 8, 7, 200)]];

    project.add_layer_img("background", &image, 0, 0).unwrap();

    let background = &project.layers()[0];
    for row in 0..3 {
        for col in 0..4 {
            let actual = background.get_original_pixel(row, col).unwrap();
            if row < 2 && col < 2 {
                assert_eq!(*actual, image[row][col].merge(&before[row][col]));
            } else {
                assert_eq!(*actual, before[row][col]);
            }
        }
    }
}

#[test]
fn test_add_layer_img_rejections_leave_layer_untouched() {
    let mut project = Project::new("stamp", 2, 2).unwrap();
    project.add_layer("art").unwrap();
    let before = project.layer("art").unwrap().clone();

    let too_big = opaque_grid(3, 1, 0);
    assert!(matches!(
        project.add_layer_img("art", &too_big, 0, 0),
        Err(CollageError::PlacementOverflow { .. })
    ));
    assert!(matches!(
        project.add_layer_img("art", &opaque_grid(1, 1, 0), 3, 0),
        Err(CollageError::PositionOffLayer { .. })
    ));
    assert!(matches!(
        project.add_layer_img("art", &opaque_grid(3, 3, 0), 0, 0),
        Err(CollageError::ImageTooLarge { .. })
    ));
    assert_eq!(project.add_layer_img("art", &[], 0, 0), Err(CollageError::EmptyImage));
    assert!(matches!(
        project.add_layer_img("missing", &opaque_grid(1, 1, 0), 0, 0),
        Err(CollageError::LayerNotFound { .. })
    ));

    assert_eq!(project.layer("art").unwrap(), &before);
}

#[test]
fn test_compress_opaque_top_layer_occludes() {
    let mut project = Project::new("stack", 2, 3).unwrap();
    project.add_layer("lower").unwrap();
    project.add_layer("upper").unwrap();
    project.add_layer_img("lower", &opaque_grid(2, 3, 1), 0, 0).unwrap();
    project.add_layer_img("upper", &opaque_grid(2, 3, 90), 0, 0).unwrap();

    let upper = project.layer("upper").unwrap().display_grid_copy();
    let flat = project.compress_to_image("flat").unwrap();

    assert_eq!(flat.name(), "flat");
    assert_eq!(flat.display_grid_copy(), upper);
}

#[test]
fn test_compress_applies_each_layers_filter() {
    let mut project = Project::new("stack", 1, 2).unwrap();
    project.add_layer("lower").unwrap();
    project.add_layer("upper").unwrap();
    project.add_layer_img("lower", &[vec![rgb(10, 20, 30, 255), rgb(40, 50, 60, 255)]], 0, 0).unwrap();
    project.add_layer_img("upper", &[vec![rgb(200, 100, 50, 255)]], 0, 1).unwrap();
    project.set_layer_filter(Filter::GreenComponent, "lower").unwrap();
    project.set_layer_filter(Filter::BlueComponent, "upper").unwrap();

    let flat = project.compress_to_image("flat").unwrap().into_owned();
    assert_eq!(flat.get_pixel(0, 0).unwrap().rgba(), (0, 20, 0, 255));
    assert_eq!(flat.get_pixel(0, 1).unwrap().rgba(), (0, 0, 50, 255));
    assert!(project.layers().iter().all(|layer| !layer.is_dirty()));
}

#[test]
fn test_screen_with_context_lightness() {
    let grid = vec![vec![Pixel::hsl(0.0, 0.0, 0.4).unwrap()], vec![Pixel::hsl(0.0, 0.0, 0.5).unwrap()]];
    let layer = Layer::new("glow", grid, 2, 1).unwrap();
    let mut project = Project::from_layers("glow", 2, 1, 255, vec![layer]).unwrap();

    project.set_layer_filter(Filter::Screen, "glow").unwrap();
    assert!(project.layers()[0].is_dirty());
    project.refresh_all();

    let glow = &project.layers()[0];
    assert_abs_diff_eq!(glow.get_pixel(0, 0).unwrap().lightness(), 0.7, epsilon = 1e-12);
    // bottom row has no context
    assert_abs_diff_eq!(glow.get_pixel(1, 0).unwrap().lightness(), 0.5, epsilon = 1e-12);
}

#[test]
fn test_difference_against_row_below() {
    let grid = vec![vec![rgb(100, 100, 100, 255)], vec![rgb(30, 150, 100, 255)]];
    let mut layer = Layer::new("diff", grid, 2, 1).unwrap();
    layer.apply_filter(Filter::Difference);

    assert_eq!(layer.get_pixel(0, 0).unwrap().rgba(), (70, 50, 0, 255));
    assert_eq!(layer.get_pixel(1, 0).unwrap().rgba(), (30, 150, 100, 255));
}

#[test]
fn test_layer_construction_failures() {
    let grid = opaque_grid(2, 2, 0);
    assert!(matches!(Layer::new("", grid.clone(), 2, 2), Err(CollageError::EmptyName { .. })));
    assert!(matches!(Layer::new("x", Vec::new(), 2, 2), Err(CollageError::RowCountMismatch { .. })));
    assert!(matches!(Layer::new("x", grid.clone(), 0, 2), Err(CollageError::InvalidDimension { .. })));
    assert!(matches!(Layer::new("x", grid.clone(), 3, 2), Err(CollageError::RowCountMismatch { .. })));
    assert!(matches!(Layer::new("x", grid, 2, 3), Err(CollageError::RowWidthMismatch { .. })));
}
