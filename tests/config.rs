use framespec::{
    ConfigError, PadPolicy, RustFftKernel, StftConfig, StftEngine, WindowCache, WindowKind,
};

#[test]
fn invalid_parameters_fail_before_any_work() {
    let bad = [
        (StftConfig::new(0, 400, 160, 400), ConfigError::ZeroSampleRate),
        (
            StftConfig::new(16_000, 0, 160, 400),
            ConfigError::ZeroWindowLength,
        ),
        (
            StftConfig::new(16_000, 400, 0, 400),
            ConfigError::ZeroHopLength,
        ),
        (
            StftConfig::new(16_000, 400, 160, 0),
            ConfigError::ZeroFftLength,
        ),
        (
            StftConfig::new(16_000, 400, 160, 256),
            ConfigError::FftShorterThanWindow {
                n_fft: 256,
                win_length: 400,
            },
        ),
    ];
    for (config, expected) in bad {
        assert_eq!(StftEngine::new(config).err(), Some(expected));
    }
}

#[test]
fn hop_beyond_window_is_a_window_gap() {
    let config = StftConfig::new(16_000, 100, 150, 128).with_pad_policy(PadPolicy::None);
    assert!(matches!(
        StftEngine::new(config),
        Err(ConfigError::WindowGap { .. })
    ));
}

#[test]
fn injected_kernel_length_must_match_n_fft() {
    let config = StftConfig::new(16_000, 400, 160, 400);
    let err = StftEngine::with_kernel(config, RustFftKernel::new(512)).err();
    assert_eq!(
        err,
        Some(ConfigError::KernelLength {
            expected: 400,
            actual: 512,
        })
    );
}

#[test]
fn parsed_configuration_surface() {
    let config = StftConfig::from_millis(16_000, 25.0, 10.0, 400)
        .with_window(WindowKind::parse("hanning").unwrap())
        .with_pad_policy(PadPolicy::parse("reflect").unwrap());
    assert_eq!(config.win_length, 400);
    assert_eq!(config.hop_length, 160);
    assert_eq!(config.window, WindowKind::Hanning);
    assert_eq!(config.pad_policy, PadPolicy::Reflect);
    assert!(StftEngine::new(config).is_ok());

    assert_eq!(
        WindowKind::parse("gaussian"),
        Err(ConfigError::UnknownWindow)
    );
    assert_eq!(
        PadPolicy::parse("wrap"),
        Err(ConfigError::UnknownPadPolicy)
    );
}

#[test]
fn engines_share_windows_through_a_cache() {
    let mut cache = WindowCache::new();
    let config = StftConfig::new(16_000, 400, 160, 400);
    let a = StftEngine::with_cache(config, &mut cache).unwrap();
    let b = StftEngine::with_cache(config, &mut cache).unwrap();
    assert_eq!(cache.len(), 1);
    assert_eq!(a.window(), b.window());
}

#[test]
fn derived_shape_accessors() {
    let config = StftConfig::new(16_000, 400, 160, 400).with_pad_policy(PadPolicy::None);
    assert_eq!(config.bins(), 201);
    assert_eq!(config.frame_count(1600), 8);
    assert_eq!(config.frame_count(399), 0);

    let centered = config.with_pad_policy(PadPolicy::Center);
    assert_eq!(centered.padded_len(1600), 2000);
    assert_eq!(centered.frame_count(1600), 11);
}
