// SPDX-License-Identifier: MIT OR Apache-2.0
//! Thread affinity and priority hints for measurement hygiene.
//!
//! Pinning keeps the measuring thread on one core so caches and TLBs stay
//! warm across rounds; a raised priority reduces preemption during passes.
//! Both are hints: failures are logged and the run continues.
//!
//! - **Linux**: `sched_getaffinity` / `pthread_setaffinity_np` / `setpriority`
//! - **Other**: every call returns `ErrorKind::Unsupported`

use std::io;

/// Number of CPUs addressable through the affinity mask
#[cfg(target_os = "linux")]
pub const CPU_SET_CAPACITY: usize = std::mem::size_of::<libc::cpu_set_t>() * 8;

/// Number of CPUs addressable through the affinity mask
#[cfg(not(target_os = "linux"))]
pub const CPU_SET_CAPACITY: usize = 1024;

/// Nice value requested by [`raise_priority`]
pub const RAISED_NICE: i32 = -10;

fn validate_core(core: usize) -> io::Result<()> {
    if core >= CPU_SET_CAPACITY {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("core index {core} exceeds CPU_SET_CAPACITY ({CPU_SET_CAPACITY})"),
        ));
    }
    Ok(())
}

/// CPUs the calling thread may run on (respects cgroups and taskset).
///
/// # Errors
///
/// Returns the OS error, or `Unsupported` off Linux.
#[cfg(target_os = "linux")]
pub fn allowed_cpus() -> io::Result<Vec<usize>> {
    // SAFETY: zeroed cpu_set_t is a valid empty set; pid 0 is the calling thread
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        let rc = libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &raw mut set);
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok((0..CPU_SET_CAPACITY)
            .filter(|&core| libc::CPU_ISSET(core, &set))
            .collect())
    }
}

/// CPUs the calling thread may run on.
///
/// # Errors
///
/// Always `Unsupported` on this platform.
#[cfg(not(target_os = "linux"))]
pub fn allowed_cpus() -> io::Result<Vec<usize>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "allowed_cpus() is not supported on this platform",
    ))
}

/// Pins the calling thread to `core`.
///
/// # Errors
///
/// `InvalidInput` for an out-of-range index, otherwise the OS error.
#[cfg(target_os = "linux")]
pub fn pin_current_thread_to_core(core: usize) -> io::Result<()> {
    validate_core(core)?;

    // SAFETY: core < CPU_SET_CAPACITY so CPU_SET stays in bounds;
    // pthread_setaffinity_np reports errors through its return value
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(core, &mut set);

        let rc = libc::pthread_setaffinity_np(
            libc::pthread_self(),
            std::mem::size_of::<libc::cpu_set_t>(),
            &raw const set,
        );
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
    }
    Ok(())
}

/// Pins the calling thread to `core`.
///
/// # Errors
///
/// `InvalidInput` for an out-of-range index, otherwise `Unsupported`.
#[cfg(not(target_os = "linux"))]
pub fn pin_current_thread_to_core(core: usize) -> io::Result<()> {
    validate_core(core)?;
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "CPU affinity is not supported on this platform",
    ))
}

/// Pins to `preferred` if allowed, else to the first allowed CPU.
///
/// Returns the core actually pinned to, or `None` after logging a warning.
#[must_use = "the pinned core may differ from the preferred one"]
pub fn pin_preferred(preferred: usize) -> Option<usize> {
    let allowed = match allowed_cpus() {
        Ok(allowed) => allowed,
        Err(e) => {
            log::warn!("could not read CPU affinity: {e}");
            return None;
        }
    };

    let core = if allowed.contains(&preferred) {
        preferred
    } else {
        let fallback = *allowed.first()?;
        log::warn!("core {preferred} is not in the allowed set, using core {fallback}");
        fallback
    };

    match pin_current_thread_to_core(core) {
        Ok(()) => {
            log::info!("pinned measuring thread to core {core}");
            Some(core)
        }
        Err(e) => {
            log::warn!("failed to pin thread to core {core}: {e}");
            None
        }
    }
}

/// Lowers the calling thread's nice value to [`RAISED_NICE`].
///
/// # Errors
///
/// Usually `PermissionDenied` without `CAP_SYS_NICE`.
#[cfg(target_os = "linux")]
pub fn raise_priority() -> io::Result<()> {
    // SAFETY: who = 0 targets the calling thread; no pointers involved
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, RAISED_NICE) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    log::info!("raised scheduling priority to nice {RAISED_NICE}");
    Ok(())
}

/// Lowers the calling thread's nice value.
///
/// # Errors
///
/// Always `Unsupported` on this platform.
#[cfg(not(target_os = "linux"))]
pub fn raise_priority() -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "priority hints are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_core_rejects_out_of_bounds() {
        assert!(validate_core(0).is_ok());
        assert!(validate_core(CPU_SET_CAPACITY - 1).is_ok());
        assert!(validate_core(CPU_SET_CAPACITY).is_err());
        assert!(validate_core(usize::MAX).is_err());
    }

    #[test]
    fn pin_out_of_bounds_fails() {
        let err = pin_current_thread_to_core(CPU_SET_CAPACITY).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn allowed_cpus_nonempty_and_pinnable() {
        let allowed = allowed_cpus().unwrap();
        assert!(!allowed.is_empty());
        let first = allowed[0];
        assert!(pin_current_thread_to_core(first).is_ok());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn pin_preferred_falls_back_to_allowed() {
        let allowed = allowed_cpus().unwrap();
        let pinned = pin_preferred(CPU_SET_CAPACITY - 1);
        if !allowed.contains(&(CPU_SET_CAPACITY - 1)) {
            assert_eq!(pinned, allowed.first().copied());
        }
    }

    #[test]
    #[cfg(not(target_os = "linux"))]
    fn unsupported_off_linux() {
        assert_eq!(
            allowed_cpus().unwrap_err().kind(),
            io::ErrorKind::Unsupported
        );
        assert!(raise_priority().is_err());
        assert_eq!(pin_preferred(0), None);
    }
}
