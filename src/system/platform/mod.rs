pub trait PlatformExtensions {
    fn thread_count(pid: u32) -> Option<usize>;
    fn process_priority(pid: u32) -> Option<i32>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn thread_count(pid: u32) -> Option<usize> {
    platform_impl::Platform::thread_count(pid)
}

pub fn process_priority(pid: u32) -> Option<i32> {
    platform_impl::Platform::process_priority(pid)
}
