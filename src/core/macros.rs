//! 核心宏定义

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use particle_engine::impl_default;
///
/// struct FadeSettings {
///     duration: f32,
///     floor: f32,
/// }
///
/// impl_default!(FadeSettings {
///     duration: 1.0,
///     floor: 0.0,
/// });
///
/// assert_eq!(FadeSettings::default().duration, 1.0);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    struct SpawnWindow {
        start: f32,
        end: f32,
        label: String,
    }

    impl_default!(SpawnWindow {
        start: 0.0,
        end: 1.5,
        label: String::from("burst"),
    });

    #[test]
    fn test_impl_default() {
        let window = SpawnWindow::default();

        assert_eq!(window.start, 0.0);
        assert_eq!(window.end, 1.5);
        assert_eq!(window.label, "burst");
    }
}
