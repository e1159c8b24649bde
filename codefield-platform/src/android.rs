//! Keyboard height on Android.
//!
//! ## Usage
//!
//! Measures how much of the activity window the soft keyboard hides by
//! comparing the decor view height with its visible display frame.

use codefield::KeyboardHeight;
use jni::{
    JNIEnv, JavaVM,
    errors::Error as JniError,
    objects::{JObject, JValue},
};
use tracing::warn;

/// Local references created by one query: window, decor view and rect.
const LOCAL_REFS: i32 = 4;

/// Strategy measuring the soft keyboard through the activity's decor view.
#[derive(Clone, Copy, Debug, Default)]
pub struct AndroidVisibleFrame;

impl AndroidVisibleFrame {
    /// Creates the strategy. The activity is looked up on every query.
    pub fn new() -> Self {
        Self
    }

    fn query() -> Result<f32, JniError> {
        let context = ndk_context::android_context();
        let vm = unsafe { JavaVM::from_raw(context.vm().cast()) }?;
        let mut env = vm.attach_current_thread()?;
        let activity = unsafe { JObject::from_raw(context.context().cast()) };

        covered_height(&mut env, &activity).inspect_err(|err| {
            if matches!(err, JniError::JavaException) {
                let _ = env.exception_describe();
                let _ = env.exception_clear();
            }
        })
    }
}

/// Decor view height minus its visible display frame.
///
/// The decor view spans the activity window, which is the screen for the
/// fullscreen activities this targets. Runs inside a local frame because the
/// query repeats on a thread that stays attached.
fn covered_height(env: &mut JNIEnv<'_>, activity: &JObject<'_>) -> Result<f32, JniError> {
    env.with_local_frame(LOCAL_REFS, |env| {
        let window = env
            .call_method(activity, "getWindow", "()Landroid/view/Window;", &[])?
            .l()?;
        let decor = env
            .call_method(&window, "getDecorView", "()Landroid/view/View;", &[])?
            .l()?;
        let frame = env.new_object("android/graphics/Rect", "()V", &[])?;
        env.call_method(
            &decor,
            "getWindowVisibleDisplayFrame",
            "(Landroid/graphics/Rect;)V",
            &[JValue::Object(&frame)],
        )?;

        let visible = env.call_method(&frame, "height", "()I", &[])?.i()?;
        let screen = env.call_method(&decor, "getHeight", "()I", &[])?.i()?;
        Ok(screen.saturating_sub(visible).max(0) as f32)
    })
}

impl KeyboardHeight for AndroidVisibleFrame {
    fn keyboard_height(&self) -> f32 {
        match Self::query() {
            Ok(height) => height,
            Err(err) => {
                warn!("Android keyboard height query failed: {err}");
                0.0
            }
        }
    }
}
