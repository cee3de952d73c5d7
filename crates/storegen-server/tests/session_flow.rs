//! Questionnaire to deployment through the studio

use pretty_assertions::assert_eq;
use std::sync::Arc;
use storegen_core::{AppConfig, GenerationOrigin, Rung, SessionError, Step};
use storegen_server::AppState;
use storegen_test_utils::{
    conversation_response, deployment_response, sample_profile, GenerationCall,
    ScriptedGeneration, ScriptedHosting,
};

#[tokio::test]
async fn generate_refine_deploy() {
    let generation = Arc::new(
        ScriptedGeneration::new()
            .on_create(Ok(conversation_response("chat_1", &[("app/page.tsx", "v1")])))
            .on_message(Ok(conversation_response("msg_1", &[("app/page.tsx", "v2")]))),
    );
    let hosting = Arc::new(
        ScriptedHosting::new().on_deploy(Ok(deployment_response("dpl_1", "acme-co.vercel.app"))),
    );
    let state = AppState::new(generation.clone(), hosting.clone(), &AppConfig::default()).unwrap();
    let mut studio = state.studio();

    let generated = studio.generate(sample_profile()).await.unwrap();
    assert_eq!(generated.rungs().collect::<Vec<_>>(), vec![Rung::Plain]);
    assert_eq!(generated.result.origin, GenerationOrigin::Plain);

    let GenerationCall::Create(request) = &generation.calls()[0] else {
        panic!("expected create");
    };
    assert!(request.prompt.contains("Acme Co"));
    assert!(request.prompt.contains("Buy Now"));

    let refined = studio.refine("warmer colors").await.unwrap();
    assert_eq!(refined.result.conversation_id, "chat_1");
    assert_eq!(refined.result.files.as_ref().unwrap().get("app/page.tsx"), Some("v2"));

    let deployed = studio.deploy(None).await.unwrap();
    assert_eq!(deployed.deployment.id, "dpl_1");
    assert_eq!(studio.session().step(), Step::Deployed);

    let payload = &hosting.payloads()[0];
    assert_eq!(payload.name, "acme-co");
    assert_eq!(payload.files.get("app/page.tsx"), Some("v2"));
    assert!(payload.files.get("package.json").unwrap().contains("\"acme-co\""));
}

#[tokio::test]
async fn deployed_session_rejects_refinement_until_start_over() {
    let hosting = Arc::new(
        ScriptedHosting::new().on_deploy(Ok(deployment_response("dpl_1", "x.vercel.app"))),
    );
    let state = AppState::new(Arc::new(ScriptedGeneration::new()), hosting, &AppConfig::default()).unwrap();
    let mut studio = state.studio();

    studio.generate(sample_profile()).await.unwrap();
    studio.deploy(Some("Acme")).await.unwrap();

    let err = studio.refine("more").await.unwrap_err();
    assert_eq!(err, SessionError::illegal(Step::Deployed, "refine"));

    studio.start_over();
    assert_eq!(studio.session().step(), Step::Questionnaire);
    assert!(studio.generate(sample_profile()).await.unwrap().result.is_mock);
}
