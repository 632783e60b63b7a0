use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use icons::{Mic, Pause, Play, RotateCcw, Square};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::{set_interval_with_handle, IntervalHandle};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobEvent, BlobPropertyBag, MediaRecorder, MediaStream, MediaStreamConstraints,
    MediaStreamTrack, Url,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RecorderState {
    Idle,
    /// Waiting on microphone permission.
    Starting,
    Recording,
    Paused,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RecorderAction {
    Start,
    Started,
    Failed,
    Pause,
    Resume,
    Stop,
    Reset,
}

impl RecorderState {
    /// `None` when the action makes no sense in this state.
    pub fn next(self, action: RecorderAction) -> Option<Self> {
        use RecorderAction as A;
        match (self, action) {
            (Self::Idle | Self::Stopped, A::Start) => Some(Self::Starting),
            (Self::Starting, A::Started) => Some(Self::Recording),
            (Self::Starting, A::Failed) => Some(Self::Idle),
            (Self::Recording, A::Pause) => Some(Self::Paused),
            (Self::Paused, A::Resume) => Some(Self::Recording),
            (Self::Recording | Self::Paused, A::Stop) => Some(Self::Stopped),
            (Self::Stopped, A::Reset) => Some(Self::Idle),
            _ => None,
        }
    }
}

pub(crate) fn format_elapsed(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// A live `MediaRecorder` plus the callbacks it holds on to. Dropping it
/// stops the recorder and releases the microphone.
struct ActiveRecording {
    recorder: MediaRecorder,
    stream: MediaStream,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
    _on_stop: Closure<dyn FnMut()>,
}

impl ActiveRecording {
    fn release_microphone(&self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }

    fn abort(&self) {
        self.recorder.set_ondataavailable(None);
        self.recorder.set_onstop(None);
        if self.recorder.state() != web_sys::RecordingState::Inactive {
            let _ = self.recorder.stop();
        }
        self.release_microphone();
    }
}

impl Drop for ActiveRecording {
    fn drop(&mut self) {
        self.abort();
    }
}

async fn open_microphone() -> Result<MediaStream, JsValue> {
    let devices = window().navigator().media_devices()?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let stream = JsFuture::from(devices.get_user_media_with_constraints(&constraints)?).await?;
    stream.dyn_into::<MediaStream>()
}

fn revoke(url: Option<String>) {
    if let Some(url) = url {
        let _ = Url::revoke_object_url(&url);
    }
}

async fn begin_recording(
    chunks: StoredValue<Vec<Blob>, LocalStorage>,
    audio_url: RwSignal<Option<String>>,
) -> Result<ActiveRecording, JsValue> {
    let stream = open_microphone().await?;
    let recorder = MediaRecorder::new_with_media_stream(&stream)?;
    chunks.set_value(Vec::new());

    let on_data = Closure::<dyn FnMut(BlobEvent)>::new(move |ev: BlobEvent| {
        if let Some(blob) = ev.data().filter(|b| b.size() > 0.0) {
            chunks.update_value(|c| c.push(blob));
        }
    });

    let mime = recorder.mime_type();
    let on_stop = Closure::<dyn FnMut()>::new(move || {
        let parts = js_sys::Array::new();
        chunks.with_value(|c| {
            for blob in c {
                parts.push(blob);
            }
        });
        let options = BlobPropertyBag::new();
        options.set_type(&mime);

        match Blob::new_with_blob_sequence_and_options(&parts, &options)
            .and_then(|blob| Url::create_object_url_with_blob(&blob))
        {
            Ok(url) => {
                revoke(audio_url.try_get_untracked().flatten());
                audio_url.try_set(Some(url));
            }
            Err(e) => tracing::warn!(error = ?e, "could not assemble recording"),
        }
    });

    recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
    recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));
    recorder.start()?;

    Ok(ActiveRecording {
        recorder,
        stream,
        _on_data: on_data,
        _on_stop: on_stop,
    })
}

/// Records a pronunciation for local playback. Nothing is uploaded.
#[component]
pub fn VoiceRecorder() -> impl IntoView {
    let state = RwSignal::new(RecorderState::Idle);
    let elapsed = RwSignal::new(0u32);
    let audio_url: RwSignal<Option<String>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let active: StoredValue<Option<ActiveRecording>, LocalStorage> = StoredValue::new_local(None);
    let chunks: StoredValue<Vec<Blob>, LocalStorage> = StoredValue::new_local(Vec::new());
    let ticker: StoredValue<Option<IntervalHandle>, LocalStorage> = StoredValue::new_local(None);

    // One tick per second while recording.
    Effect::new(move |_| {
        let recording = state.get() == RecorderState::Recording;
        ticker.update_value(|t| match (recording, t.is_some()) {
            (true, false) => {
                *t = set_interval_with_handle(
                    move || {
                        elapsed.try_update(|s| *s += 1);
                    },
                    Duration::from_secs(1),
                )
                .ok();
            }
            (false, true) => {
                if let Some(h) = t.take() {
                    h.clear();
                }
            }
            _ => {}
        });
    });

    // False once the component is gone.
    let apply = move |action: RecorderAction| -> bool {
        match state.try_get_untracked().and_then(|s| s.next(action)) {
            Some(next) => state.try_set(next).is_none(),
            None => false,
        }
    };

    let on_start = move |_| {
        if !apply(RecorderAction::Start) {
            return;
        }
        error.set(None);
        spawn_local(async move {
            match begin_recording(chunks, audio_url).await {
                Ok(recording) => {
                    // Unmounted while waiting: dropping aborts the recording.
                    if !apply(RecorderAction::Started) {
                        return;
                    }
                    revoke(audio_url.try_get_untracked().flatten());
                    audio_url.try_set(None);
                    elapsed.try_set(0);
                    active.try_update_value(|a| *a = Some(recording));
                }
                Err(e) => {
                    tracing::warn!(error = ?e, "microphone unavailable");
                    apply(RecorderAction::Failed);
                    error.try_set(Some("Microphone access was denied or is unavailable.".to_string()));
                }
            }
        });
    };

    let on_pause = move |_| {
        if apply(RecorderAction::Pause) {
            active.with_value(|a| a.as_ref().map(|r| r.recorder.pause()));
        }
    };

    let on_resume = move |_| {
        if apply(RecorderAction::Resume) {
            active.with_value(|a| a.as_ref().map(|r| r.recorder.resume()));
        }
    };

    let on_stop = move |_| {
        if apply(RecorderAction::Stop) {
            active.with_value(|a| {
                if let Some(r) = a {
                    let _ = r.recorder.stop();
                    r.release_microphone();
                }
            });
        }
    };

    let on_reset = move |_| {
        if apply(RecorderAction::Reset) {
            active.set_value(None);
            revoke(audio_url.get_untracked());
            audio_url.set(None);
            elapsed.set(0);
        }
    };

    on_cleanup(move || {
        if let Some(Some(h)) = ticker.try_update_value(|t| t.take()) {
            h.clear();
        }
        active.try_update_value(|a| a.take());
        revoke(audio_url.try_get_untracked().flatten());
    });

    let is = move |s: RecorderState| state.get() == s;

    view! {
        <div data-name="VoiceRecorder" class="flex flex-col gap-2 rounded-lg border px-3 py-2">
            <div class="flex items-center gap-2">
                <Show when=move || !is(RecorderState::Recording) && !is(RecorderState::Paused)>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:r#type="button"
                        attr:disabled=move || is(RecorderState::Starting)
                        on:click=on_start
                    >
                        <Mic />
                        {move || if is(RecorderState::Stopped) { "Record again" } else { "Record" }}
                    </Button>
                </Show>
                <Show when=move || is(RecorderState::Recording)>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm attr:r#type="button" on:click=on_pause>
                        <Pause />
                        "Pause"
                    </Button>
                </Show>
                <Show when=move || is(RecorderState::Paused)>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm attr:r#type="button" on:click=on_resume>
                        <Play />
                        "Resume"
                    </Button>
                </Show>
                <Show when=move || is(RecorderState::Recording) || is(RecorderState::Paused)>
                    <Button variant=ButtonVariant::Destructive size=ButtonSize::Sm attr:r#type="button" on:click=on_stop>
                        <Square />
                        "Stop"
                    </Button>
                </Show>
                <Show when=move || is(RecorderState::Stopped)>
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Icon attr:r#type="button" attr:aria-label="Discard recording" on:click=on_reset>
                        <RotateCcw />
                    </Button>
                </Show>
                <span class="ml-auto font-mono text-xs text-muted-foreground tabular-nums">
                    {move || format_elapsed(elapsed.get())}
                </span>
            </div>

            {move || audio_url.get().map(|url| view! { <audio class="w-full" controls=true src=url></audio> })}
            {move || error.get().map(|e| view! { <p class="text-xs text-destructive">{e}</p> })}
        </div>
    }
}
