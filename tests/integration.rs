// SPDX-License-Identifier: MPL-2.0
use backpack_configurator::app::config::{self, Config};
use backpack_configurator::configurator::Configurator;
use backpack_configurator::domain::palette::{body_tint, hardware_tint};
use backpack_configurator::domain::{
    handoff, Color, ConfigChange, ConfigOption, Configuration, Hardware, Material,
};
use backpack_configurator::i18n::I18n;
use backpack_configurator::material::cache::DEFAULT_CAPACITY;
use backpack_configurator::material::{loader, LoadOutcome, DEFAULT_HARDWARE_MESH};
use backpack_configurator::scene::{Geometry, MeshNode, SceneGraph, SceneNode};
use image_rs::{ImageBuffer, Rgb};
use std::path::Path;
use tempfile::tempdir;

fn backpack() -> SceneGraph {
    SceneGraph::new(vec![SceneNode::new("Backpack")
        .with_mesh(MeshNode::new("Mesh_0", Geometry::cube(1.0)))
        .with_mesh(MeshNode::new(DEFAULT_HARDWARE_MESH, Geometry::cube(0.2)))])
}

/// Texture files are JPEGs, which carry no alpha channel.
fn write_texture(path: &Path, rgb: [u8; 3]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Rgb(rgb));
    image.save(path).unwrap();
}

#[tokio::test]
async fn configuration_changes_flow_through_texture_loads() {
    let assets = tempdir().unwrap();
    let mut configurator =
        Configurator::new(Configuration::default(), DEFAULT_HARDWARE_MESH, DEFAULT_CAPACITY);

    let update = configurator.set_scene(backpack());
    assert_eq!(update.report.assigned, 2);
    assert_eq!(update.loads.len(), 6);

    // Everything but the body base color exists on disk.
    let missing = update
        .loads
        .iter()
        .find(|request| request.key.channel.is_color() && request.key.set.prefix() != "metall")
        .map(|request| request.key)
        .unwrap();
    for request in &update.loads {
        if request.key != missing {
            write_texture(&request.key.path(assets.path()), [200, 200, 200]);
        }
    }

    let mut reported = 0;
    for request in update.loads {
        let result = loader::load_texture(request.key.path(assets.path())).await;
        match configurator.texture_loaded(request.generation, request.key, result) {
            LoadOutcome::Stored { current } => assert!(current),
            LoadOutcome::Failed { report, .. } => {
                assert!(report);
                reported += 1;
            }
        }
    }
    assert_eq!(reported, 1);
    assert_eq!(configurator.pending_loads(), 0);
    assert_eq!(configurator.ready_textures().len(), 5);

    // A color change keeps the texture sets: only the failed read is retried.
    let update = configurator
        .apply(ConfigChange::Color(Color::DarkBlue))
        .unwrap();
    let retried: Vec<_> = update.loads.iter().map(|request| request.key).collect();
    assert_eq!(retried, vec![missing]);
    let scene = configurator.scene().unwrap();
    let body = scene.find_mesh("Mesh_0").unwrap().material().unwrap();
    let hardware = scene
        .find_mesh(DEFAULT_HARDWARE_MESH)
        .unwrap()
        .material()
        .unwrap();
    assert_eq!(body.tint, body_tint(Color::DarkBlue));
    assert_eq!(hardware.tint, hardware_tint(Hardware::Silver));

    // A material change needs the new body set.
    let update = configurator
        .apply(ConfigChange::Material(Material::Leather))
        .unwrap();
    assert_eq!(update.loads.len(), 3);
    assert!(configurator.apply(ConfigChange::Material(Material::Leather)).is_none());
}

#[test]
fn handoff_link_round_trips_every_configuration() {
    for &material in Material::ALL {
        for &color in Color::ALL {
            for &hardware in Hardware::ALL {
                let configuration = Configuration {
                    material,
                    color,
                    hardware,
                };
                let url = handoff::build("https://shop.example/configurator", &configuration);
                let request = handoff::parse(&url).unwrap();
                assert!(request.ar);
                assert_eq!(request.configuration, configuration);
            }
        }
    }
}

#[test]
fn settings_round_trip_and_drive_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");

    let mut settings = Config::default();
    settings.general.language = Some("uk".to_string());
    settings.startup.material = Some(Material::Fabric);
    settings.startup.hardware = Some(Hardware::Gold);
    settings.textures.cache_capacity = Some(2);
    config::save_to_path(&settings, &path).unwrap();

    let loaded = config::load_from_path(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.cache_capacity(), config::MIN_TEXTURE_CACHE_CAPACITY);

    let startup = loaded.startup.configuration();
    assert_eq!(startup.material, Material::Fabric);
    assert_eq!(startup.color, Color::default());
    assert_eq!(startup.hardware, Hardware::Gold);

    let i18n = I18n::new(None, &loaded);
    assert_eq!(i18n.current_locale().to_string(), "uk");
    assert_ne!(i18n.tr("app-title"), "app-title");
}

#[test]
fn broken_settings_fall_back_to_defaults_with_warning() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("settings.toml"), "[startup\nmaterial = ").unwrap();

    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert_eq!(loaded, Config::default());
    assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
}

#[test]
fn cli_field_flags_override_handoff_link() {
    let flags = backpack_configurator::app::Flags {
        handoff: Some(
            handoff::parse("http://localhost:3000?ar=true&material=leather&color=black").unwrap(),
        ),
        color: Some(Color::parse("brown").unwrap()),
        ..Default::default()
    };
    let (configuration, open_ar) =
        backpack_configurator::app::resolve_startup(&Config::default(), &flags);
    assert!(open_ar);
    assert_eq!(configuration.material, Material::Leather);
    assert_eq!(configuration.color, Color::Brown);
}
