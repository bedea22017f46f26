//! Window, input sampling, and the fixed-step frame loop.

use std::time::{Duration, Instant};

use glam::Vec2;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::assets::AssetCatalog;
use crate::consts::*;
use crate::error::InitError;
use crate::renderer::{RenderState, SpriteInstance};
use crate::sim::{GamePhase, GameState, SpriteId, TickInput, tick};

/// Build the window, renderer, and game state, then run the loop until quit.
///
/// Initialization is a straight line: any failure short-circuits with its
/// own error class, and the caller turns that into a distinct exit status.
pub fn run(seed: u64) -> Result<(), InitError> {
    let event_loop = EventLoop::new()?;

    let mut window_attributes = Window::default_attributes();
    window_attributes.title = WINDOW_TITLE.into();
    window_attributes.inner_size = Some(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT).into());
    window_attributes.resizable = false;
    let window = event_loop.create_window(window_attributes)?;

    // The surface borrows the window for the rest of the process
    let window: &'static Window = Box::leak(Box::new(window));

    let mut renderer = RenderState::new(window)?;
    let catalog = AssetCatalog::load(&mut renderer)?;

    let mut state = GameState::new(seed, catalog.sprite_sizes());
    let mut input = TickInput::default();
    let mut next_tick = Instant::now();
    let mut announced_game_over = false;

    log::info!("world ready, seed {seed}");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput { event, .. } => handle_key(&mut input, &event, elwt),
            WindowEvent::Resized(new_size) => renderer.resize(new_size.width, new_size.height),
            WindowEvent::RedrawRequested => {
                let scene = build_scene(&state, &catalog);
                match renderer.render(&scene) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let (w, h) = renderer.size;
                        renderer.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory");
                        elwt.exit();
                    }
                    Err(e) => log::warn!("render error: {e:?}"),
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            if now >= next_tick {
                tick(&mut state, &input, FIXED_DT);
                if state.phase == GamePhase::GameOver && !announced_game_over {
                    log::info!("game over after {} ticks", state.time_ticks);
                    announced_game_over = true;
                }
                window.request_redraw();
                // Open-loop pacing: one tick period from now, ignoring how
                // long the frame actually took.
                next_tick = now + Duration::from_secs_f32(FIXED_DT);
            }
            elwt.set_control_flow(ControlFlow::WaitUntil(next_tick));
        }
        _ => {}
    })?;

    log::info!("shut down cleanly");
    Ok(())
}

/// Flip exactly the latch matching the key; everything else is ignored.
fn handle_key(input: &mut TickInput, event: &KeyEvent, elwt: &ActiveEventLoop) {
    let down = event.state == ElementState::Pressed;
    match event.physical_key {
        PhysicalKey::Code(KeyCode::KeyW | KeyCode::ArrowUp) => input.up = down,
        PhysicalKey::Code(KeyCode::KeyS | KeyCode::ArrowDown) => input.down = down,
        PhysicalKey::Code(KeyCode::KeyA | KeyCode::ArrowLeft) => input.left = down,
        PhysicalKey::Code(KeyCode::KeyD | KeyCode::ArrowRight) => input.right = down,
        PhysicalKey::Code(KeyCode::Space) => input.shoot = down,
        PhysicalKey::Code(KeyCode::Escape) if down => elwt.exit(),
        _ => {}
    }
}

/// Background first, then the ship, then meteors and bullets in insertion
/// order. Doomed entities are reaped before this runs, so they never appear.
fn build_scene(state: &GameState, catalog: &AssetCatalog) -> Vec<SpriteInstance> {
    let mut scene = Vec::with_capacity(state.entities.len() + 2);

    scene.push(SpriteInstance {
        texture: catalog.handle(SpriteId::Background),
        pos: Vec2::ZERO,
        size: Vec2::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32),
        rotation: 0.0,
    });

    if !state.player.is_doomed() {
        scene.push(SpriteInstance {
            texture: catalog.handle(state.player.sprite),
            pos: state.player.pos,
            size: state.player.size,
            rotation: state.player.rotation,
        });
    }

    for entity in &state.entities {
        scene.push(SpriteInstance {
            texture: catalog.handle(entity.sprite),
            pos: entity.pos,
            size: entity.size,
            rotation: entity.rotation,
        });
    }

    scene
}
