mod common;

use std::fs;

use common::{CpuBackend, Recorded};
use ferrum::{
    Engine, FerrumError, Function, FunctionRegistry, LibraryResolver, ResolverConfig, ScaleShift,
    Shape, View, ViewMut,
};

fn engine() -> Engine<CpuBackend> {
    Engine::with_backend(CpuBackend::reference(), FunctionRegistry::builtin()).unwrap()
}

fn runs(engine: &Engine<CpuBackend>) -> Vec<common::RecordedRun> {
    engine.backend().unwrap().runs()
}

#[test]
fn test_vect_add_clamps_to_shorter_input() {
    let engine = engine();
    let a = [1.0f32, 2.0, 3.0];
    let b = [10.0f32, 20.0, 30.0, 40.0];
    let mut out = [0.0f32; 4];
    engine.vect_add(&a, &b, &mut out).unwrap();
    assert_eq!(out, [11.0, 22.0, 33.0, 0.0]);

    let runs = runs(&engine);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].name, "vector_add");
    assert_eq!(runs[0].threads, 3);
}

#[test]
fn test_vect_add_is_idempotent() {
    let engine = engine();
    let a: Vec<f32> = (0..100).map(|i| i as f32 * 0.1).collect();
    let b: Vec<f32> = (0..100).map(|i| 1.0 / (i as f32 + 1.0)).collect();
    let mut first = vec![0.0f32; 100];
    let mut second = vec![0.0f32; 100];
    engine.vect_add(&a, &b, &mut first).unwrap();
    engine.vect_add(&a, &b, &mut second).unwrap();
    let bits = |v: &[f32]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn test_binary_slots_and_strides() {
    let engine = engine();
    let a = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
    let b = [100.0f32, 200.0, 300.0];
    let mut out = [0.0f32; 6];
    engine
        .bbB(
            Function::VectorSub.id(),
            Shape::Vector,
            View::new(&a, 1, 2).unwrap(),
            View::contiguous(&b),
            ViewMut::new(&mut out, 0, 2).unwrap(),
        )
        .unwrap();
    // a at 1, 3, 5; out at 0, 2, 4.
    assert_eq!(out, [-98.0, 0.0, -196.0, 0.0, -294.0, 0.0]);

    let run = &runs(&engine)[0];
    assert_eq!(run.threads, 3);
    assert_eq!(run.args.len(), 9);
    assert_eq!(run.args[0], Recorded::Buffer(a.to_vec()));
    assert_eq!(&run.args[1..3], &[Recorded::Uint(1), Recorded::Uint(2)]);
    assert_eq!(run.args[3], Recorded::Buffer(b.to_vec()));
    assert_eq!(&run.args[7..9], &[Recorded::Uint(0), Recorded::Uint(2)]);
}

#[test]
fn test_scalar_families() {
    let engine = engine();
    let a = [1.0f32, 2.0, 3.0];

    let mut out = [0.0f32; 3];
    engine
        .bfB(Function::VectorPowx.id(), Shape::Vector, View::contiguous(&a), 2.0, ViewMut::contiguous(&mut out))
        .unwrap();
    assert_eq!(out, [1.0, 4.0, 9.0]);

    let neg = [-1.0f32, 2.0];
    let mut out = [0.0f32; 2];
    engine
        .fbB(Function::VectorElu.id(), Shape::Vector, 0.5, View::contiguous(&neg), ViewMut::contiguous(&mut out))
        .unwrap();
    assert!((out[0] - 0.5 * ((-1.0f32).exp() - 1.0)).abs() < 1e-6);
    assert_eq!(out[1], 2.0);

    let mut out = [0.0f32; 3];
    engine
        .bffffB(
            Function::VectorScaleShift.id(),
            Shape::Vector,
            View::contiguous(&a),
            ScaleShift::new(2.0, 1.0, 0.0, 0.0),
            ViewMut::contiguous(&mut out),
        )
        .unwrap();
    assert_eq!(out, [3.0, 5.0, 7.0]);

    let b = [1.0f32, 1.0, 1.0];
    let mut out = [0.0f32; 3];
    engine
        .bbffffB(
            Function::VectorLinearFrac.id(),
            Shape::Vector,
            View::contiguous(&a),
            View::contiguous(&b),
            ScaleShift::new(1.0, 1.0, 2.0, 0.0),
            ViewMut::contiguous(&mut out),
        )
        .unwrap();
    assert_eq!(out, [1.0, 1.5, 2.0]);

    let runs = runs(&engine);
    // fbB binds the scalar first.
    assert_eq!(runs[1].args[0], Recorded::Float(0.5));
    // bbffffB binds both arrays before the four scalars.
    let frac = &runs[3].args;
    assert_eq!(
        &frac[6..10],
        &[Recorded::Float(1.0), Recorded::Float(1.0), Recorded::Float(2.0), Recorded::Float(0.0)]
    );
}

#[test]
fn test_in_out_operand_is_copied_back() {
    let engine = engine();
    let a = [0.0f32, 1.0];
    let mut b = [7.0f32, 7.0];
    let mut out = [0.0f32; 2];
    engine
        .bBB(
            Function::VectorSincos.id(),
            Shape::Vector,
            View::contiguous(&a),
            ViewMut::contiguous(&mut b),
            ViewMut::contiguous(&mut out),
        )
        .unwrap();
    assert_eq!(out, [0.0, 1.0f32.sin()]);
    assert_eq!(b, [1.0, 1.0f32.cos()]);
}

#[test]
fn test_zero_input_fill() {
    let engine = engine();
    let mut out = [0.0f32; 5];
    engine
        .fB(Function::VectorSet.id(), Shape::Vector, 4.0, ViewMut::new(&mut out, 1, 2).unwrap())
        .unwrap();
    assert_eq!(out, [0.0, 4.0, 0.0, 4.0, 0.0]);
}

#[test]
fn test_shape_slots_lead() {
    let engine = engine();
    let a = [1.0f32; 4];
    let b = [2.0f32; 4];

    let mut out = [0.0f32; 4];
    engine
        .bbB(
            Function::GeAdd.id(),
            Shape::general(2, 2).unwrap(),
            View::contiguous(&a),
            View::contiguous(&b),
            ViewMut::contiguous(&mut out),
        )
        .unwrap();
    assert_eq!(out, [3.0; 4]);

    let mut out = [0.0f32; 4];
    engine
        .bbB(
            Function::UploAdd.id(),
            Shape::uplo(2, false, true).unwrap(),
            View::contiguous(&a),
            View::contiguous(&b),
            ViewMut::contiguous(&mut out),
        )
        .unwrap();

    let runs = runs(&engine);
    assert_eq!(&runs[0].args[..2], &[Recorded::Uint(2), Recorded::Uint(2)]);
    assert_eq!(
        &runs[1].args[..3],
        &[Recorded::Uint(2), Recorded::Uint(0), Recorded::Uint(1)]
    );
    assert_eq!(runs[1].args.len(), 3 + 9);
}

#[test]
fn test_empty_output_skips_the_device() {
    let backend = CpuBackend::reference();
    let probe = backend.probe();
    let engine = Engine::with_backend(backend, FunctionRegistry::builtin()).unwrap();

    let a: [f32; 0] = [];
    let mut out: [f32; 0] = [];
    engine
        .bB(Function::VectorAbs.id(), Shape::Vector, View::contiguous(&a), ViewMut::contiguous(&mut out))
        .unwrap();
    assert!(runs(&engine).is_empty());
    assert_eq!(probe.buffers(), 0);

    // The pipeline is still checked first.
    let err = engine
        .bB(Function::VectorExp.id(), Shape::Vector, View::contiguous(&a), ViewMut::contiguous(&mut out))
        .unwrap_err();
    assert_eq!(err, FerrumError::PipelineUnavailable(Function::VectorExp.id()));
}

#[test]
fn test_buffers_released_on_every_path() {
    let a = [1.0f32, 2.0];
    let b = [3.0f32, 4.0];

    let backend = CpuBackend::reference();
    let probe = backend.probe();
    let engine = Engine::with_backend(backend, FunctionRegistry::builtin()).unwrap();
    let mut out = [0.0f32; 2];
    engine.vect_add(&a, &b, &mut out).unwrap();
    assert_eq!(probe.buffers(), 0);

    let backend = CpuBackend::reference().failing_buffers_after(2);
    let probe = backend.probe();
    let engine = Engine::with_backend(backend, FunctionRegistry::builtin()).unwrap();
    let mut out = [0.0f32; 2];
    assert_eq!(engine.vect_add(&a, &b, &mut out).unwrap_err(), FerrumError::BufferAllocation);
    assert_eq!(probe.buffers(), 0);
    assert!(runs(&engine).is_empty());

    let backend = CpuBackend::reference().failing_runs();
    let probe = backend.probe();
    let engine = Engine::with_backend(backend, FunctionRegistry::builtin()).unwrap();
    let mut out = [0.0f32; 2];
    let err = engine.vect_add(&a, &b, &mut out).unwrap_err();
    assert!(matches!(err, FerrumError::DispatchFailed(_)));
    assert_eq!(out, [0.0, 0.0]);
    assert_eq!(probe.buffers(), 0);
}

#[test]
fn test_unknown_name_and_missing_pipeline() {
    let engine = Engine::with_backend(
        CpuBackend::with_functions(&["vector_add"]),
        FunctionRegistry::builtin(),
    )
    .unwrap();

    assert_eq!(
        engine.function_id("vector_nope").unwrap_err(),
        FerrumError::UnrecognizedFunction("vector_nope".into())
    );

    let id = engine.function_id("vector_sub").unwrap();
    let a = [1.0f32];
    let mut out = [0.0f32];
    let err = engine
        .bbB(id, Shape::Vector, View::contiguous(&a), View::contiguous(&a), ViewMut::contiguous(&mut out))
        .unwrap_err();
    assert_eq!(err, FerrumError::PipelineUnavailable(id));
}

#[test]
fn test_open_from_library_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("libferrum.metallib"), "vector_add\nvector_sub\n").unwrap();
    let resolver = LibraryResolver::without_bundle(
        ResolverConfig::default()
            .with_env_var("FERRUM_TEST_ENGINE_UNSET")
            .with_default_dir(dir.path()),
    );

    let engine: Engine<CpuBackend> = Engine::open(&resolver, None, FunctionRegistry::builtin());
    assert!(engine.is_usable());
    assert_eq!(engine.pipelines().unwrap().loaded(), 2);

    let engine: Engine<CpuBackend> =
        Engine::open(&resolver, dir.path().to_str(), FunctionRegistry::builtin());
    assert!(engine.is_usable());
}

#[test]
fn test_failed_open_leaves_engine_unusable() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = LibraryResolver::without_bundle(
        ResolverConfig::default()
            .with_env_var("FERRUM_TEST_ENGINE_UNSET_2")
            .with_default_dir(dir.path()),
    );
    let engine: Engine<CpuBackend> = Engine::open(&resolver, None, FunctionRegistry::builtin());
    assert!(!engine.is_usable());
    assert_eq!(engine.init_error(), Some(&FerrumError::LibraryNotFound(None)));

    let a = [1.0f32];
    let b = [2.0f32];
    let mut out = [0.0f32];
    assert_eq!(
        engine.vect_add(&a, &b, &mut out).unwrap_err(),
        FerrumError::PipelineUnavailable(Function::VectorAdd.id())
    );

    // An empty library is a construction failure too.
    fs::write(dir.path().join("libferrum.metallib"), "").unwrap();
    let engine: Engine<CpuBackend> = Engine::open(&resolver, None, FunctionRegistry::builtin());
    assert_eq!(engine.init_error(), Some(&FerrumError::NoFunctions));
}

#[test]
fn test_vect_add_uses_engine_registry() {
    let registry = std::sync::Arc::new(FunctionRegistry::from_names(["vector_add", "vector_sub"]));
    let engine = Engine::with_backend(
        CpuBackend::with_functions(&["vector_add", "vector_sub"]),
        registry,
    )
    .unwrap();
    assert_eq!(engine.function_id("vector_add").unwrap().raw(), 0);

    let a = [1.0f32, 2.0, 3.0];
    let b = [10.0f32, 20.0, 30.0, 40.0];
    let mut out = [0.0f32; 3];
    engine.vect_add(&a, &b, &mut out).unwrap();
    assert_eq!(out, [11.0, 22.0, 33.0]);

    let mut out = [0.0f32; 3];
    engine
        .bbB(
            engine.function_id("vector_add").unwrap(),
            Shape::Vector,
            View::contiguous(&a),
            View::contiguous(&b),
            ViewMut::contiguous(&mut out),
        )
        .unwrap();
    assert_eq!(out, [11.0, 22.0, 33.0]);
}
