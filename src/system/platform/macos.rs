use libproc::libproc::proc_pid::pidinfo;
use libproc::libproc::task_info::TaskInfo;

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn thread_count(pid: u32) -> Option<usize> {
        let info = pidinfo::<TaskInfo>(pid as i32, 0).ok()?;
        usize::try_from(info.pti_threadnum).ok()
    }

    fn process_priority(pid: u32) -> Option<i32> {
        // Clear errno before call
        unsafe { *libc::__error() = 0 };
        let prio = unsafe { libc::getpriority(libc::PRIO_PROCESS, pid as libc::id_t) };
        // getpriority returns -1 on error, but -1 can also be a valid priority
        let errno = unsafe { *libc::__error() };
        if prio == -1 && errno != 0 {
            None
        } else {
            Some(prio)
        }
    }
}
