use std::mem;

/// Structure describing an inotify event.
///
/// Mirrors the fixed-size header of `struct inotify_event`; the variable-length name that follows
/// it in the kernel's buffer is not part of the record.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct INotifyInfo {
    /// Watch descriptor
    pub wd: i32,

    /// Watch mask
    pub mask: u32,

    /// Cookie to synchronize two events
    pub cookie: u32,

    /// Length (including NULs) of name
    pub len: u32,
}

/// Size of [`INotifyInfo`] in memory, in bytes
pub const INOTIFY_INFO_SIZE: usize = mem::size_of::<INotifyInfo>();
