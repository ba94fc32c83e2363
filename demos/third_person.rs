use avian3d::prelude::*;
use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow},
};
use bevy_mantle::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Third-Person Mantle".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(BevyMantlePlugin)
        .add_systems(Startup, (setup, spawn_hud, setup_cursor_grab))
        .add_systems(Update, (toggle_cursor_grab, update_hud))
        .run();
}

// World units are centimetres, matching the character tuning.

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.55, 0.35),
        perceptual_roughness: 0.9,
        ..default()
    });
    let stone = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.43, 0.46),
        perceptual_roughness: 0.85,
        ..default()
    });
    let zone_mat = materials.add(StandardMaterial {
        base_color: Color::srgba(0.2, 0.5, 0.8, 0.25),
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    // Ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(10_000.0, 10_000.0))),
        MeshMaterial3d(ground_mat),
        Transform::from_translation(Vec3::ZERO),
        RigidBody::Static,
        Collider::half_space(Vec3::Y),
        CollisionLayers::new(GameLayer::World, [GameLayer::Player]),
    ));

    // Climbable ledges: walls short enough for the ledge probe to clear,
    // each with a platform top to mantle onto.
    for (i, height) in [220.0_f32, 260.0, 290.0].into_iter().enumerate() {
        let x = 600.0 + i as f32 * 500.0;
        let size = Vec3::new(300.0, height, 200.0);

        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(stone.clone()),
            Transform::from_translation(Vec3::new(x, height / 2.0, 600.0)),
            RigidBody::Static,
            Collider::cuboid(size.x, size.y, size.z),
            CollisionLayers::new(GameLayer::World, [GameLayer::Player]),
        ));

        // Climb zone hugging the approach face of the wall
        let zone_size = Vec3::new(size.x, height + 100.0, 250.0);
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(zone_size.x, zone_size.y, zone_size.z))),
            MeshMaterial3d(zone_mat.clone()),
            Transform::from_translation(Vec3::new(x, zone_size.y / 2.0, 600.0 - 200.0)),
            Collider::cuboid(zone_size.x, zone_size.y, zone_size.z),
            CollisionLayers::new(GameLayer::Trigger, [GameLayer::Player]),
            Sensor,
            ClimbZone,
        ));
    }

    // Lighting
    commands.spawn((
        DirectionalLight {
            illuminance: 14000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.7, 0.5, 0.0)),
    ));
    commands.spawn(AmbientLight {
        color: Color::srgb(0.6, 0.7, 0.9),
        brightness: 350.0,
        affects_lightmapped_meshes: true,
    });
}

// ── HUD ─────────────────────────────────────────────────────────────

#[derive(Component)]
struct HudText;

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        HudText,
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
    ));
}

fn update_hud(
    player_query: Query<(&PlayerVelocity, &Sprint, &Climber, &AnimSignals), With<Player>>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    let Ok((velocity, sprint, climber, signals)) = player_query.single() else {
        return;
    };

    let horizontal_speed = Vec2::new(velocity.x, velocity.z).length();
    let state = if climber.is_climbing() {
        "hanging (Space to mantle, C to drop)"
    } else if climber.movement_disabled() {
        "mantling"
    } else if signals.can_grab() {
        "ledge in reach"
    } else {
        "roaming"
    };

    for mut text in &mut hud_query {
        **text = format!(
            "Speed:   {:.0} cm/s\nStamina: {:.0}\nState:   {state}",
            horizontal_speed,
            sprint.stamina(),
        );
    }
}

// ── Cursor grab ──────────────────────────────────────────────────────

fn setup_cursor_grab(mut cursor_query: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    if let Ok(mut cursor) = cursor_query.single_mut() {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
}

fn toggle_cursor_grab(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut cursor_query: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let Ok(mut cursor) = cursor_query.single_mut() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Escape) {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    } else if mouse.just_pressed(MouseButton::Left) && cursor.grab_mode == CursorGrabMode::None {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
}
