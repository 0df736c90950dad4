//! Platform and compiler parameter tables.
//!
//! Pure data. Each table entry is a function from the environment to a list
//! of tokens; entries that never depend on the environment just ignore it.
//! The literal flags are a contract with CoACD's CMake project and must not
//! drift.

use crate::builder::errors::BuildError;
use crate::core::environment::Environment;
use crate::core::platform::{Arch, Compiler, PlatformFamily, Step};

/// Flags passed to every configure step.
pub const COMMON_CMAKE_FLAGS: [&str; 2] = [
    "-DCMAKE_BUILD_TYPE=Release",
    "-DCMAKE_POLICY_VERSION_MINIMUM=3.5",
];

/// NDK release used when the environment does not pin one.
pub const DEFAULT_NDK_VERSION: &str = "28.1.13356709";

/// Minimum Android API level.
pub const ANDROID_PLATFORM: &str = "android-21";

/// CMake target that produces the CoACD library.
pub const BUILD_TARGET: &str = "main";

/// Configuration selected for multi-config generators.
pub const BUILD_CONFIG: &str = "Release";

/// A table entry: tokens computed from the environment.
pub type FlagFn = fn(&Environment) -> Result<Vec<String>, BuildError>;

pub fn android_abi(arch: Arch) -> Option<&'static str> {
    match arch {
        Arch::Arm32 => Some("armeabi-v7a"),
        Arch::Arm64 => Some("arm64-v8a"),
        Arch::X86_32 => Some("x86"),
        Arch::X86_64 => Some("x86_64"),
        Arch::Wasm32 => None,
    }
}

/// Visual Studio generator platform name (`-A`).
pub fn windows_arch(arch: Arch) -> Option<&'static str> {
    match arch {
        Arch::X86_64 => Some("x64"),
        Arch::X86_32 => Some("Win32"),
        Arch::Arm64 => Some("ARM64"),
        Arch::Arm32 | Arch::Wasm32 => None,
    }
}

/// Pointer width, as encoded in dependency build directory names.
pub fn arch_bits(arch: Arch) -> u32 {
    match arch {
        Arch::X86_64 | Arch::Arm64 => 64,
        Arch::X86_32 | Arch::Arm32 | Arch::Wasm32 => 32,
    }
}

/// Runtime marker in dependency build directory names.
///
/// Only MSVC builds link the static `MultiThreaded` runtime, which oneTBB
/// records as `mt`.
pub fn runtime_tag(compiler: Compiler) -> Option<&'static str> {
    match compiler {
        Compiler::Msvc => Some("mt"),
        Compiler::Mingw | Compiler::Clang | Compiler::Gnu => None,
    }
}

/// Library file extensions produced for this environment.
pub fn library_extensions(env: &Environment) -> &'static [&'static str] {
    match (env.platform.family(), env.compiler) {
        (PlatformFamily::Windows, Compiler::Msvc) => &["lib"],
        _ => &["a"],
    }
}

/// Configure flags for a platform family.
pub fn platform_entry(family: PlatformFamily) -> FlagFn {
    match family {
        PlatformFamily::Unix => no_flags,
        PlatformFamily::Android => android_flags,
        PlatformFamily::Windows => no_flags,
        PlatformFamily::Web => web_flags,
    }
}

/// Configure flags for a compiler on a platform family.
///
/// `None` means the pair is unsupported.
pub fn compiler_entry(family: PlatformFamily, compiler: Compiler) -> Option<FlagFn> {
    match (family, compiler) {
        (PlatformFamily::Unix, Compiler::Gnu | Compiler::Clang) => Some(no_flags as FlagFn),
        (PlatformFamily::Android, Compiler::Clang) => Some(no_flags as FlagFn),
        (PlatformFamily::Windows, Compiler::Msvc) => Some(msvc_flags as FlagFn),
        (PlatformFamily::Windows, Compiler::Mingw) => Some(mingw_flags as FlagFn),
        (PlatformFamily::Web, Compiler::Clang) => Some(no_flags as FlagFn),
        _ => None,
    }
}

/// Compilers that have an entry for `family`.
pub fn supported_compilers(family: PlatformFamily) -> Vec<Compiler> {
    Compiler::ALL
        .into_iter()
        .filter(|c| compiler_entry(family, *c).is_some())
        .collect()
}

/// Wrapper command placed in front of the tool for `(family, step)`.
///
/// The web build goes through the Emscripten wrappers, which are batch
/// scripts on the Windows hosts this target is built from.
pub fn process_prefix(family: PlatformFamily, step: Step) -> &'static [&'static str] {
    match (family, step) {
        (PlatformFamily::Web, Step::Configure) => &["cmd", "/c", "emcmake"],
        (PlatformFamily::Web, Step::Build) => &["cmd", "/c", "emmake"],
        _ => &[],
    }
}

fn no_flags(_env: &Environment) -> Result<Vec<String>, BuildError> {
    Ok(Vec::new())
}

fn android_flags(env: &Environment) -> Result<Vec<String>, BuildError> {
    let home = env.android_home().ok_or(BuildError::MissingAndroidHome)?;
    let abi = android_abi(env.arch).ok_or(BuildError::UnsupportedArch {
        platform: env.platform,
        arch: env.arch,
        table: "android ABI",
    })?;

    let ndk = home.join(format!("ndk/{}", env.ndk_version()));

    Ok(vec![
        "-G".to_string(),
        "Ninja".to_string(),
        format!(
            "-DCMAKE_TOOLCHAIN_FILE={}/build/cmake/android.toolchain.cmake",
            ndk.display()
        ),
        format!("-DANDROID_ABI={}", abi),
        format!("-DANDROID_PLATFORM={}", ANDROID_PLATFORM),
    ])
}

fn web_flags(_env: &Environment) -> Result<Vec<String>, BuildError> {
    Ok(vec![
        "-DCMAKE_SKIP_INSTALL_RULES=ON".to_string(),
        "-DCMAKE_CXX_FLAGS=-Wno-missing-template-arg-list-after-template-kw \
         -Wno-unknown-warning-option \
         -s USE_PTHREADS=1"
            .to_string(),
    ])
}

fn msvc_flags(env: &Environment) -> Result<Vec<String>, BuildError> {
    let arch = windows_arch(env.arch).ok_or(BuildError::UnsupportedArch {
        platform: env.platform,
        arch: env.arch,
        table: "windows generator platform",
    })?;

    Ok(vec![
        "-A".to_string(),
        arch.to_string(),
        "-DCMAKE_MSVC_RUNTIME_LIBRARY=MultiThreaded".to_string(),
        "-DCMAKE_CXX_FLAGS=/MT /EHsc".to_string(),
    ])
}

fn mingw_flags(_env: &Environment) -> Result<Vec<String>, BuildError> {
    Ok(vec!["-G".to_string(), "MinGW Makefiles".to_string()])
}
