//! Raw evdev keyboard source for Linux
//!
//! Reads `input_event` records straight from `/dev/input/event*`. Works
//! without a display server and sees keys regardless of which window has
//! focus, but needs read access to the devices (root or the `input` group).

use super::{Drain, EventBuffer, Key, KeyTransition, KeyboardSource};
use crate::error::DeviceError;
use nix::libc;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

const EV_SYN: u16 = 0x00;
const EV_KEY: u16 = 0x01;
const SYN_DROPPED: u16 = 3;
const KEY_REPEAT: i32 = 2;
const INPUT_EVENT_SIZE: usize = std::mem::size_of::<libc::input_event>();
const READ_BATCH: usize = 64;

/// Find all keyboard input devices
fn find_keyboard_devices() -> Result<Vec<PathBuf>, DeviceError> {
    let input_dir = Path::new("/dev/input");
    if !input_dir.exists() {
        return Err(DeviceError::NoDevices);
    }

    let mut keyboards: Vec<PathBuf> = fs::read_dir(input_dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.starts_with("event"))
        })
        .filter(|path| is_keyboard_device(path))
        .collect();

    if keyboards.is_empty() {
        return Err(DeviceError::NoDevices);
    }

    keyboards.sort();
    Ok(keyboards)
}

/// Check if a device is a keyboard by examining /sys/class/input
fn is_keyboard_device(device_path: &Path) -> bool {
    let Some(name) = device_path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    let caps_path = format!("/sys/class/input/{}/device/capabilities/key", name);
    if let Ok(caps) = fs::read_to_string(&caps_path) {
        // Hex bitmap of supported keys; a real keyboard has dozens
        let total_bits: u32 = caps
            .split_whitespace()
            .filter_map(|hex| u64::from_str_radix(hex, 16).ok())
            .map(|n| n.count_ones())
            .sum();
        return total_bits > 50;
    }

    let name_path = format!("/sys/class/input/{}/device/name", name);
    if let Ok(dev_name) = fs::read_to_string(&name_path) {
        let dev_name = dev_name.to_lowercase();
        return dev_name.contains("keyboard") || dev_name.contains("kbd");
    }
    false
}

fn set_nonblocking(file: &File) -> io::Result<()> {
    let fd = file.as_raw_fd();
    // SAFETY: fd is a valid descriptor owned by `file` for the duration of the calls
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

struct OpenDevice {
    path: PathBuf,
    file: File,
    /// Scancodes currently held on this device
    pressed: HashSet<u16>,
}

impl OpenDevice {
    fn new(path: PathBuf, file: File) -> Self {
        Self {
            path,
            file,
            pressed: HashSet::new(),
        }
    }
}

/// Evdev-based keyboard source
pub struct EvdevListener {
    devices: Vec<OpenDevice>,
    buffer: EventBuffer,
    read_buf: Vec<u8>,
}

impl EvdevListener {
    pub fn new(capacity: usize) -> Self {
        Self {
            devices: Vec::new(),
            buffer: EventBuffer::new(capacity),
            read_buf: vec![0u8; INPUT_EVENT_SIZE * READ_BATCH],
        }
    }

    fn held_elsewhere(&self, index: usize, code: u16) -> bool {
        self.devices
            .iter()
            .enumerate()
            .any(|(i, device)| i != index && device.pressed.contains(&code))
    }

    /// Handle one raw record from device `index`. Returns the transition it
    /// produced, if any.
    ///
    /// A key counts as held while any open device holds it, so only the
    /// first press and the last release across devices are reported.
    fn translate(
        &mut self,
        index: usize,
        event_type: u16,
        code: u16,
        value: i32,
    ) -> Option<KeyTransition> {
        if event_type == EV_SYN && code == SYN_DROPPED {
            // The kernel queue overflowed; events were lost before we saw them
            self.buffer.mark_overflow();
            return None;
        }
        if event_type != EV_KEY || value == KEY_REPEAT {
            return None;
        }

        let is_down = value != 0;
        let elsewhere = self.held_elsewhere(index, code);
        let pressed = &mut self.devices[index].pressed;
        let changed = if is_down {
            pressed.insert(code)
        } else {
            pressed.remove(&code)
        };
        (changed && !elsewhere).then(|| KeyTransition::new(Key::from_scancode(code), is_down))
    }

    fn read_device(&mut self, index: usize) -> Result<(), DeviceError> {
        loop {
            let read = self.devices[index].file.read(&mut self.read_buf);
            let bytes_read = match read {
                Ok(n) if n >= INPUT_EVENT_SIZE => n,
                Ok(_) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(DeviceError::Read {
                        path: self.devices[index].path.display().to_string(),
                        source,
                    })
                }
            };

            let records: Vec<(u16, u16, i32)> = self.read_buf[..bytes_read]
                .chunks_exact(INPUT_EVENT_SIZE)
                .map(|bytes| {
                    // SAFETY: the chunk holds exactly one input_event written by the kernel
                    let event: libc::input_event =
                        unsafe { std::ptr::read_unaligned(bytes.as_ptr().cast()) };
                    (event.type_, event.code, event.value)
                })
                .collect();

            for (event_type, code, value) in records {
                if let Some(transition) = self.translate(index, event_type, code, value) {
                    self.buffer.push(transition);
                }
            }
        }
    }
}

impl KeyboardSource for EvdevListener {
    fn name(&self) -> &'static str {
        "evdev"
    }

    fn acquire(&mut self) -> Result<(), DeviceError> {
        if !self.devices.is_empty() {
            return Ok(());
        }

        for path in find_keyboard_devices()? {
            match File::open(&path) {
                Ok(file) => {
                    set_nonblocking(&file)?;
                    log::debug!("Opened keyboard device {}", path.display());
                    self.devices.push(OpenDevice::new(path, file));
                }
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    log::debug!("Skipping {}: permission denied", path.display());
                }
                Err(e) => return Err(DeviceError::Io(e)),
            }
        }

        if self.devices.is_empty() {
            return Err(DeviceError::PermissionDenied(
                "every keyboard under /dev/input (run as root or join the 'input' group)"
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn drain(&mut self, out: &mut Vec<KeyTransition>, max: usize) -> Result<Drain, DeviceError> {
        if self.devices.is_empty() {
            return Err(DeviceError::NotAcquired(self.name()));
        }
        for index in 0..self.devices.len() {
            self.read_device(index)?;
        }
        Ok(self.buffer.drain(out, max))
    }

    fn release(&mut self) {
        self.devices.clear();
        self.buffer.clear();
    }
}

/// Check if evdev is usable (keyboards exist under /dev/input)
pub fn is_evdev_available() -> bool {
    find_keyboard_devices().is_ok()
}
