use super::PlatformExtensions;

pub struct Platform;

use windows_sys::Win32::{
    Foundation::{CloseHandle, INVALID_HANDLE_VALUE},
    System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, TH32CS_SNAPTHREAD, THREADENTRY32, Thread32First, Thread32Next,
    },
    System::Threading::{GetPriorityClass, OpenProcess, PROCESS_QUERY_INFORMATION},
};

impl PlatformExtensions for Platform {
    fn thread_count(pid: u32) -> Option<usize> {
        unsafe {
            let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPTHREAD, 0);
            if snapshot == INVALID_HANDLE_VALUE {
                return None;
            }
            let mut entry = std::mem::zeroed::<THREADENTRY32>();
            entry.dwSize = std::mem::size_of::<THREADENTRY32>() as u32;

            let mut count = 0usize;
            let mut ok = Thread32First(snapshot, &mut entry);
            while ok != 0 {
                if entry.th32OwnerProcessID == pid {
                    count += 1;
                }
                ok = Thread32Next(snapshot, &mut entry);
            }
            CloseHandle(snapshot);
            if count == 0 { None } else { Some(count) }
        }
    }

    fn process_priority(pid: u32) -> Option<i32> {
        unsafe {
            let handle = OpenProcess(PROCESS_QUERY_INFORMATION, 0, pid);
            if handle.is_null() {
                return None;
            }
            let prio = GetPriorityClass(handle);
            CloseHandle(handle);
            if prio == 0 { None } else { Some(prio as i32) }
        }
    }
}
