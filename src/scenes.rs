//! Ready made scenes, each with the camera and background it is meant to be seen with.

use crate::{
    camera::{Camera, Lens},
    integrator::Background,
    material::{Dielectric, DiffuseLight, Lambertian, Material, Metal},
    primitives::{AxisRect, ConstantMedium, Cuboid, MovingSphere, RotateY, Sphere, Translate},
    scene::Scene,
    textures::{CheckerTexture, ImageTexture, NoisePattern, NoiseTexture, TexelImage, Texture},
    DefaultRng, Intersect,
};
use glam::{vec3, Vec3};
use rand::prelude::*;
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};

/// The built-in scenes, named in snake case in config files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    RandomSpheres,
    TwoSpheres,
    PerlinSpheres,
    Planet,
    SimpleLight,
    CornellBox,
    CornellSmoke,
    FinalScene,
}

impl Default for SceneKind {
    fn default() -> Self {
        SceneKind::RandomSpheres
    }
}

/// Everything needed to render a scene
pub struct SceneSetup {
    pub world: Arc<dyn Intersect>,
    pub camera: Camera,
    pub background: Background,
}

/// Decoded images by name, as referenced by the scenes
pub type Textures = HashMap<String, TexelImage>;

/// Builds `kind` for an image of the given aspect ratio
pub fn build(kind: SceneKind, aspect: f32, textures: &Textures, rng: &mut DefaultRng) -> SceneSetup {
    log::debug!("Building scene {:?}", kind);

    match kind {
        SceneKind::RandomSpheres => random_spheres(aspect, rng),
        SceneKind::TwoSpheres => two_spheres(aspect, rng),
        SceneKind::PerlinSpheres => perlin_spheres(aspect, rng),
        SceneKind::Planet => planet(aspect, textures, rng),
        SceneKind::SimpleLight => simple_light(aspect, rng),
        SceneKind::CornellBox => cornell_box(aspect, rng),
        SceneKind::CornellSmoke => cornell_smoke(aspect, rng),
        SceneKind::FinalScene => final_scene(aspect, textures, rng),
    }
}

fn lambertian(color: Vec3) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_color(color))
}

fn light(color: Vec3) -> Arc<dyn Material> {
    Arc::new(DiffuseLight::from_color(color))
}

fn image_texture(textures: &Textures, name: &str) -> Arc<dyn Texture> {
    match textures.get(name) {
        Some(image) => Arc::new(ImageTexture::new(image.clone())),
        None => {
            log::warn!("No image named {:?} was loaded, using a placeholder", name);
            Arc::new(ImageTexture::missing())
        }
    }
}

fn random_color(rng: &mut DefaultRng, min: f32, max: f32) -> Vec3 {
    vec3(
        rng.gen_range(min, max),
        rng.gen_range(min, max),
        rng.gen_range(min, max),
    )
}

fn finish(scene: Scene, camera: Camera, background: Background, rng: &mut DefaultRng) -> SceneSetup {
    let (time0, time1) = camera.shutter();

    SceneSetup {
        world: Arc::new(scene.build_bvh(time0, time1, rng)),
        camera,
        background,
    }
}

// Many small spheres on a checkered ground, the diffuse ones bouncing during the shutter
fn random_spheres(aspect: f32, rng: &mut DefaultRng) -> SceneSetup {
    let mut scene = Scene::new();

    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        vec3(0.2, 0.3, 0.1),
        vec3(0.9, 0.9, 0.9),
    ));
    scene.add(Sphere::new(
        vec3(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(checker)),
    ));

    // Small spheres share one glass material
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    for a in -11..11 {
        for b in -11..11 {
            let choose_material = rng.gen::<f32>();
            let center = vec3(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - vec3(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_material < 0.8 {
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                let center1 = center + vec3(0.0, rng.gen_range(0.0, 0.5), 0.0);
                scene.add(MovingSphere::new(
                    (center, center1),
                    (0.0, 1.0),
                    0.2,
                    lambertian(albedo),
                ));
            } else if choose_material < 0.95 {
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0, 0.5);
                scene.add(Sphere::new(center, 0.2, Arc::new(Metal::fuzzy(albedo, fuzz))));
            } else {
                scene.add(Sphere::new(center, 0.2, glass.clone()));
            }
        }
    }

    scene
        .add(Sphere::new(vec3(0.0, 1.0, 0.0), 1.0, glass))
        .add(Sphere::new(vec3(-4.0, 1.0, 0.0), 1.0, lambertian(vec3(0.4, 0.2, 0.1))))
        .add(Sphere::new(
            vec3(4.0, 1.0, 0.0),
            1.0,
            Arc::new(Metal::new(vec3(0.7, 0.6, 0.5))),
        ));

    let camera = Camera::from_fov(vec3(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y, 20.0, aspect, 10.0)
        .with_lens(Lens::aperture(0.1))
        .with_shutter(0.0, 1.0);

    finish(scene, camera, Background::Sky, rng)
}

fn two_spheres(aspect: f32, rng: &mut DefaultRng) -> SceneSetup {
    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        vec3(0.2, 0.3, 0.1),
        vec3(0.9, 0.9, 0.9),
    ));
    let material: Arc<dyn Material> = Arc::new(Lambertian::new(checker));

    let mut scene = Scene::new();
    scene
        .add(Sphere::new(vec3(0.0, -10.0, 0.0), 10.0, material.clone()))
        .add(Sphere::new(vec3(0.0, 10.0, 0.0), 10.0, material));

    let camera = Camera::from_fov(vec3(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y, 20.0, aspect, 10.0);

    finish(scene, camera, Background::Sky, rng)
}

fn marble(rng: &mut DefaultRng) -> Arc<dyn Material> {
    let texture = NoiseTexture::new(4.0, NoisePattern::Marble, rng);
    Arc::new(Lambertian::new(Arc::new(texture)))
}

fn perlin_spheres(aspect: f32, rng: &mut DefaultRng) -> SceneSetup {
    let material = marble(rng);

    let mut scene = Scene::new();
    scene
        .add(Sphere::new(vec3(0.0, -1000.0, 0.0), 1000.0, material.clone()))
        .add(Sphere::new(vec3(0.0, 2.0, 0.0), 2.0, material));

    let camera = Camera::from_fov(vec3(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y, 20.0, aspect, 10.0);

    finish(scene, camera, Background::Sky, rng)
}

// A gas giant with a moon, both image textured
fn planet(aspect: f32, textures: &Textures, rng: &mut DefaultRng) -> SceneSetup {
    let planet = Arc::new(Lambertian::new(image_texture(textures, "planet")));
    let moon = Arc::new(Lambertian::new(image_texture(textures, "moon")));

    let mut scene = Scene::new();
    scene
        .add(Sphere::new(Vec3::ZERO, 5.0, planet))
        .add(Sphere::new(vec3(0.0, -30.0, 0.0), 25.0, moon));

    let eye = vec3(0.0, 20.0, 100.0);
    let camera = Camera::from_fov(eye, Vec3::ZERO, Vec3::Y, 20.0, aspect, eye.length());

    finish(scene, camera, Background::Sky, rng)
}

fn simple_light(aspect: f32, rng: &mut DefaultRng) -> SceneSetup {
    let material = marble(rng);

    let mut scene = Scene::new();
    scene
        .add(Sphere::new(vec3(0.0, -1000.0, 0.0), 1000.0, material.clone()))
        .add(Sphere::new(vec3(0.0, 2.0, 0.0), 2.0, material))
        .add(AxisRect::xy((3.0, 5.0), (1.0, 3.0), -2.0, light(Vec3::splat(4.0))))
        .add(Sphere::new(vec3(0.0, 7.0, 0.0), 2.0, light(Vec3::splat(4.0))));

    let camera = Camera::from_fov(
        vec3(26.0, 3.0, 6.0),
        vec3(0.0, 2.0, 0.0),
        Vec3::Y,
        20.0,
        aspect,
        10.0,
    );

    finish(scene, camera, Background::Solid(Vec3::ZERO), rng)
}

// The walls and light of a Cornell box
fn cornell_walls(scene: &mut Scene, light_color: Vec3, light_extent: ((f32, f32), (f32, f32))) {
    let red = lambertian(vec3(0.65, 0.05, 0.05));
    let white = lambertian(vec3(0.73, 0.73, 0.73));
    let green = lambertian(vec3(0.12, 0.45, 0.15));
    let (light_x, light_z) = light_extent;

    scene
        .add(AxisRect::yz((0.0, 555.0), (0.0, 555.0), 555.0, green))
        .add(AxisRect::yz((0.0, 555.0), (0.0, 555.0), 0.0, red))
        .add(AxisRect::xz(light_x, light_z, 554.0, light(light_color)))
        .add(AxisRect::xz((0.0, 555.0), (0.0, 555.0), 0.0, white.clone()))
        .add(AxisRect::xz((0.0, 555.0), (0.0, 555.0), 555.0, white.clone()))
        .add(AxisRect::xy((0.0, 555.0), (0.0, 555.0), 555.0, white));
}

fn cornell_camera(aspect: f32) -> Camera {
    let eye = vec3(278.0, 278.0, -800.0);
    let center = vec3(278.0, 278.0, 0.0);
    Camera::from_fov(eye, center, Vec3::Y, 40.0, aspect, 10.0)
}

// The two boxes standing in the Cornell box, rotated and moved into place
fn cornell_blocks() -> (Arc<dyn Intersect>, Arc<dyn Intersect>) {
    let white = lambertian(vec3(0.73, 0.73, 0.73));

    let tall = Arc::new(Cuboid::new(Vec3::ZERO, vec3(165.0, 330.0, 165.0), white.clone()));
    let tall = Arc::new(RotateY::new(tall, 15.0));
    let tall: Arc<dyn Intersect> = Arc::new(Translate::new(tall, vec3(265.0, 0.0, 295.0)));

    let short = Arc::new(Cuboid::new(Vec3::ZERO, vec3(165.0, 165.0, 165.0), white));
    let short = Arc::new(RotateY::new(short, -18.0));
    let short: Arc<dyn Intersect> = Arc::new(Translate::new(short, vec3(130.0, 0.0, 65.0)));

    (tall, short)
}

fn cornell_box(aspect: f32, rng: &mut DefaultRng) -> SceneSetup {
    let mut scene = Scene::new();
    cornell_walls(&mut scene, Vec3::splat(15.0), ((213.0, 343.0), (227.0, 332.0)));

    let (tall, short) = cornell_blocks();
    scene.add_shared(tall).add_shared(short);

    finish(scene, cornell_camera(aspect), Background::Solid(Vec3::ZERO), rng)
}

fn cornell_smoke(aspect: f32, rng: &mut DefaultRng) -> SceneSetup {
    let mut scene = Scene::new();
    cornell_walls(&mut scene, Vec3::splat(7.0), ((113.0, 443.0), (127.0, 432.0)));

    let (tall, short) = cornell_blocks();
    scene
        .add(ConstantMedium::from_color(tall, 0.01, Vec3::ZERO))
        .add(ConstantMedium::from_color(short, 0.01, Vec3::ONE));

    finish(scene, cornell_camera(aspect), Background::Solid(Vec3::ZERO), rng)
}

// Every feature in one scene
fn final_scene(aspect: f32, textures: &Textures, rng: &mut DefaultRng) -> SceneSetup {
    let mut scene = Scene::new();

    let ground = lambertian(vec3(0.48, 0.83, 0.53));
    let mut boxes = Scene::new();
    for i in 0..20 {
        for j in 0..20 {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = rng.gen_range(1.0, 101.0);
            boxes.add(Cuboid::new(
                vec3(x0, 0.0, z0),
                vec3(x0 + w, y1, z0 + w),
                ground.clone(),
            ));
        }
    }
    scene.add(boxes.build_bvh(0.0, 1.0, rng));

    scene.add(AxisRect::xz((123.0, 423.0), (147.0, 412.0), 554.0, light(Vec3::splat(7.0))));

    let center0 = vec3(400.0, 400.0, 200.0);
    let center1 = center0 + vec3(30.0, 0.0, 0.0);
    scene.add(MovingSphere::new(
        (center0, center1),
        (0.0, 1.0),
        50.0,
        lambertian(vec3(0.7, 0.3, 0.1)),
    ));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    scene
        .add(Sphere::new(vec3(260.0, 150.0, 45.0), 50.0, glass.clone()))
        .add(Sphere::new(
            vec3(0.0, 150.0, 145.0),
            50.0,
            Arc::new(Metal::fuzzy(vec3(0.8, 0.8, 0.9), 1.0)),
        ));

    // A glass ball filled with blue fog
    let boundary: Arc<dyn Intersect> =
        Arc::new(Sphere::new(vec3(360.0, 150.0, 145.0), 70.0, glass.clone()));
    scene
        .add_shared(boundary.clone())
        .add(ConstantMedium::from_color(boundary, 0.2, vec3(0.2, 0.4, 0.9)));

    // Thin mist over everything
    let mist: Arc<dyn Intersect> = Arc::new(Sphere::new(Vec3::ZERO, 5000.0, glass));
    scene.add(ConstantMedium::from_color(mist, 0.0001, Vec3::ONE));

    let earth = Arc::new(Lambertian::new(image_texture(textures, "earth")));
    scene.add(Sphere::new(vec3(400.0, 200.0, 400.0), 100.0, earth));

    let noise = NoiseTexture::new(0.1, NoisePattern::Marble, rng);
    scene.add(Sphere::new(
        vec3(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::new(Arc::new(noise))),
    ));

    let white = lambertian(Vec3::splat(0.73));
    let mut cluster = Scene::new();
    for _ in 0..1000 {
        cluster.add(Sphere::new(random_color(rng, 0.0, 165.0), 10.0, white.clone()));
    }
    let cluster = Arc::new(cluster.build_bvh(0.0, 1.0, rng));
    scene.add(Translate::new(
        Arc::new(RotateY::new(cluster, 15.0)),
        vec3(-100.0, 270.0, 395.0),
    ));

    let camera = Camera::from_fov(
        vec3(478.0, 278.0, -600.0),
        vec3(278.0, 278.0, 0.0),
        Vec3::Y,
        40.0,
        aspect,
        10.0,
    )
    .with_shutter(0.0, 1.0);

    finish(scene, camera, Background::Solid(Vec3::ZERO), rng)
}
