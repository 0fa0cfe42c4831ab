//! Checks whether the process has administrator rights

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        pub fn is_elevated() -> bool {
            unsafe { windows::Win32::UI::Shell::IsUserAnAdmin().as_bool() }
        }
    } else if #[cfg(unix)] {
        pub fn is_elevated() -> bool {
            nix::unistd::geteuid().is_root()
        }
    } else {
        pub fn is_elevated() -> bool {
            false
        }
    }
}
