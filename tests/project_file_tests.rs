//! Integration tests for project persistence and export
//!
//! Loads a `collage.toml`, builds a project from it, round-trips the project
//! through its text file and writes flattened output to PPM and PNG.

use collager::config::{find_config_from, load_config, ConfigError, CONFIG_FILE};
use collager::format::{layer_to_ppm, load_project, parse_project, save_project};
use collager::output::{grid_from_image, load_image_grid, save_layer_png};
use collager::{Filter, Pixel, Project};
use image::{Rgba, RgbaImage};
use std::fs;
use tempfile::TempDir;

const POSTER_CONFIG: &str = r#"
[project]
name = "poster"
width = 4
height = 3

[background]
name = "paper"
color = [240, 230, 200]
alpha = 255
"#;

fn poster_dir() -> TempDir {
    let temp = TempDir::new().expect("should create temp dir");
    fs::write(temp.path().join(CONFIG_FILE), POSTER_CONFIG).expect("should write config");
    temp
}

fn checker() -> RgbaImage {
    RgbaImage::from_fn(2, 2, |x, y| if (x + y) % 2 == 0 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 0, 0]) })
}

#[test]
fn test_project_from_discovered_config() {
    let temp = poster_dir();
    let nested = temp.path().join("scans");
    fs::create_dir_all(&nested).unwrap();

    let path = find_config_from(nested).expect("config should be found in parent");
    let config = load_config(Some(&path)).unwrap();
    let project = Project::from_config(&config).unwrap();

    assert_eq!(project.name(), "poster");
    assert_eq!((project.height(), project.width()), (3, 4));
    assert_eq!(project.layers().len(), 1);
    let paper = project.layer("paper").expect("background takes configured name");
    assert_eq!(paper.get_pixel(2, 3).unwrap().rgba(), (240, 230, 200, 255));
}

#[test]
fn test_invalid_config_reports_every_field() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(CONFIG_FILE);
    fs::write(&path, "[project]\nname = \"\"\nwidth = 0\n\n[background]\ncolor = [300, 0, 0]\n").unwrap();

    match load_config(Some(&path)) {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 3),
        other => panic!("expected validation errors, got {:?}", other),
    }
}

#[test]
fn test_stamp_save_load_and_flatten() {
    let temp = poster_dir();
    let config = load_config(Some(&temp.path().join(CONFIG_FILE))).unwrap();
    let mut project = Project::from_config(&config).unwrap();

    let stamp = grid_from_image(&checker(), project.max_value()).unwrap();
    project.add_layer("ink").unwrap();
    project.add_layer_img("ink", &stamp, 1, 2).unwrap();
    project.add_layer("tint").unwrap();
    project.set_layer_filter(Filter::DarkenIntensity, "ink").unwrap();

    let file = temp.path().join("poster.collage");
    save_project(&project, &file).unwrap();
    let mut reloaded = load_project(&file).unwrap();

    assert_eq!(reloaded.format_project(), project.format_project());
    assert_eq!(reloaded.layer("ink").unwrap().filter(), Filter::DarkenIntensity);

    let expected = project.compress_to_image("flat").unwrap().into_owned();
    let flat = reloaded.compress_to_image("flat").unwrap().into_owned();
    assert_eq!(flat, expected);

    // darken-intensity of pure red: 255 - 85
    assert_eq!(flat.get_pixel(1, 2).unwrap().rgba(), (170, 0, 0, 255));
    assert_eq!(flat.get_pixel(1, 3).unwrap().rgba(), (0, 0, 0, 0));
    assert_eq!(flat.get_pixel(0, 0).unwrap().rgba(), (0, 0, 0, 0));
}

#[test]
fn test_export_flattened_layer() {
    let temp = TempDir::new().unwrap();
    let mut project = Project::new("export", 2, 2).unwrap();
    let stamp = grid_from_image(&checker(), 255).unwrap();
    project.add_layer("ink").unwrap();
    project.add_layer_img("ink", &stamp, 0, 0).unwrap();

    let flat = project.compress_to_image("flat").unwrap().into_owned();

    let ppm = layer_to_ppm(&flat);
    assert!(ppm.starts_with("P3\n# flat.ppm\n2 2\n255\n"));
    assert_eq!(ppm.lines().nth(4), Some("255 0 0 0 0 0"));

    let png = temp.path().join("out/flat.png");
    save_layer_png(&flat, &png).unwrap();
    let decoded = load_image_grid(&png, 255).unwrap();
    assert_eq!(decoded, flat.display_grid_copy());
}

#[test]
fn test_truncated_project_file_is_rejected() {
    let project = Project::new("short", 2, 2).unwrap();
    let text = project.format_project();
    let truncated: String = text.lines().take(5).map(|line| format!("{}\n", line)).collect();

    assert!(parse_project(&truncated).is_err());
    assert!(parse_project(&text).is_ok());
}

#[test]
fn test_deeper_max_value_round_trip() {
    let mut project = Project::with_max_value("deep", 1, 1, 1023).unwrap();
    let fill = Pixel::rgb_with_max(1000, 512, 3, 1023, 1023).unwrap();
    project.add_layer("ink").unwrap();
    project.add_layer_img("ink", &[vec![fill]], 0, 0).unwrap();

    let parsed = parse_project(&project.format_project()).unwrap();
    assert_eq!(parsed.max_value(), 1023);
    assert_eq!(parsed.layer("ink").unwrap().get_original_pixel(0, 0).unwrap().rgba(), (1000, 512, 3, 1023));
}
