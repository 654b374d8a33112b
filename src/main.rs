// main.rs - window setup and the event-to-viewer wiring

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod camera;
mod error;
mod input;
mod mesh;
mod renderer;
mod viewer;

use error::ViewerError;
use input::{PointerInput, PointerPosition, WheelInput};
use renderer::Renderer;
use viewer::Viewer;

use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use image::io::Reader as ImageReader;
use image::GenericImageView;
use log::{error, info};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

type LoadResult = Result<image::RgbaImage, ViewerError>;

fn main() {
    env_logger::init();

    let Some(image_path) = resolve_image_path() else {
        error!("{}", ViewerError::NoImage);
        std::process::exit(1);
    };

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("pano360")
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)
            .unwrap(),
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), viewer::DEFAULT_FOV));
    let mut viewer = Viewer::new();

    let mut cursor_pos: Option<PhysicalPosition<f64>> = None;
    let mut panorama_on_screen = false;

    let (tx, rx): (Sender<LoadResult>, Receiver<LoadResult>) = channel();
    start_load_image(image_path, tx.clone());

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match rx.try_recv() {
            Ok(Ok(rgba)) => {
                renderer.load_panorama(rgba);
                panorama_on_screen = true;
            }
            Ok(Err(e)) => {
                error!("{e}");
                if !panorama_on_screen {
                    // nothing to show yet, a failed first load is fatal
                    *control_flow = ControlFlow::Exit;
                }
            }
            Err(_) => {}
        }

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }

                WindowEvent::Resized(new_size) => {
                    renderer.resize(new_size);
                }

                WindowEvent::KeyboardInput { input, .. } => {
                    if input.state == ElementState::Pressed {
                        match input.virtual_keycode {
                            Some(VirtualKeyCode::O) => {
                                if let Some(path) = pick_image_file() {
                                    start_load_image(path, tx.clone());
                                }
                            }
                            Some(VirtualKeyCode::Escape) => viewer.stop(),
                            _ => {}
                        }
                    }
                }

                WindowEvent::MouseInput { state, button, .. } => {
                    if button == MouseButton::Left {
                        match state {
                            ElementState::Pressed => {
                                if let Some(pos) = cursor_pos {
                                    viewer.pointer_down(&PointerInput::from_client(
                                        pos.x as f32,
                                        pos.y as f32,
                                    ));
                                }
                            }
                            ElementState::Released => viewer.pointer_up(),
                        }
                    }
                }

                WindowEvent::CursorMoved { position, .. } => {
                    cursor_pos = Some(position);
                    if viewer.is_dragging() {
                        viewer.pointer_move(&PointerInput::from_client(
                            position.x as f32,
                            position.y as f32,
                        ));
                    }
                }

                WindowEvent::CursorLeft { .. } => {
                    cursor_pos = None;
                    viewer.pointer_left();
                }

                WindowEvent::MouseWheel { delta, .. } => {
                    viewer.wheel(&wheel_input(delta));
                }

                WindowEvent::Touch(touch) => {
                    let pos = PointerPosition {
                        x: touch.location.x as f32,
                        y: touch.location.y as f32,
                    };
                    match touch.phase {
                        TouchPhase::Started => {
                            viewer.pointer_down(&PointerInput::from_touches(vec![pos]));
                        }
                        TouchPhase::Moved => {
                            viewer.pointer_move(&PointerInput::from_touches(vec![pos]));
                        }
                        TouchPhase::Ended | TouchPhase::Cancelled => {
                            // lifted fingers report through the changed list
                            viewer.pointer_move(&PointerInput::from_changed_touches(vec![pos]));
                            viewer.pointer_up();
                        }
                    }
                }

                WindowEvent::DroppedFile(path) => {
                    start_load_image(path, tx.clone());
                }

                _ => {}
            },

            Event::RedrawRequested(_) => {
                renderer.update_camera(viewer.lon, viewer.lat, viewer.fov);
                match renderer.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => *control_flow = ControlFlow::Exit,
                    Err(e) => error!("render error: {e:?}"),
                }
            }

            Event::MainEventsCleared => {
                if viewer.is_running() {
                    window.request_redraw();
                } else {
                    *control_flow = ControlFlow::Exit;
                }
            }

            _ => {}
        }
    });
}

/// winit folds the host's scroll conventions into two variants; map them back
/// onto the delta fields the zoom math understands.
fn wheel_input(delta: MouseScrollDelta) -> WheelInput {
    match delta {
        // three detents per line, detent sign runs opposite to pixel deltas
        MouseScrollDelta::LineDelta(_, y) => WheelInput::from_detail(-y * 3.0),
        MouseScrollDelta::PixelDelta(pos) => WheelInput::from_wheel_delta_y(pos.y as f32),
    }
}

/// Panorama path from `--image <path>`, the first positional argument or the
/// PANO360_IMAGE environment variable, falling back to a file dialog.
fn resolve_image_path() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(a) = args.next() {
        if a == "--image" {
            if let Some(v) = args.next() {
                return Some(PathBuf::from(v));
            }
        } else if !a.starts_with('-') {
            return Some(PathBuf::from(a));
        }
    }

    if let Ok(v) = std::env::var("PANO360_IMAGE") {
        if !v.trim().is_empty() {
            return Some(PathBuf::from(v));
        }
    }

    pick_image_file()
}

fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", &["jpg", "jpeg", "png", "bmp"])
        .pick_file()
}

/// Decode the image off the event-loop thread; the result crosses back over
/// the channel and is picked up at the top of the loop.
fn start_load_image(path: PathBuf, tx: Sender<LoadResult>) {
    thread::spawn(move || {
        info!("loading panorama {:?}", path);

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                let _ = tx.send(Err(ViewerError::OpenImage { path, source: e }));
                return;
            }
        };
        let reader = BufReader::new(file);

        let img_result = ImageReader::new(reader)
            .with_guessed_format()
            .map_err(image::ImageError::IoError)
            .and_then(|mut r| {
                r.no_limits();
                r.decode()
            });

        match img_result {
            Ok(img) => {
                let (w, h) = img.dimensions();
                info!("panorama decoded, {}x{}", w, h);
                if tx.send(Ok(img.to_rgba8())).is_err() {
                    error!("event loop went away before the panorama arrived");
                }
            }
            Err(e) => {
                let _ = tx.send(Err(ViewerError::DecodeImage { path, source: e }));
            }
        }
    });
}
