//! Handler for the `nestjs_sentry_scaffold` tool.
//!
//! Returns a fixed multi-block tutorial for wiring Sentry into a NestJS
//! project. Deterministic and without side effects; it is also the one tool
//! whose result carries more than one content block.

use rmcp::model::{CallToolResult, Content, JsonObject};
use schemars::JsonSchema;

use super::registry::{ToolContext, ToolFuture, ToolHandler};
use super::schema::schema_for;

/// The tool takes no arguments; anything passed is ignored.
#[derive(JsonSchema)]
#[allow(dead_code)]
struct ScaffoldArgs {}

const STEPS: [&str; 8] = [
    "To scaffold a NestJS project with Sentry integration, follow these steps:",
    r#"1. Create the following files:

src/interceptors/sentry.interceptor.ts:
```typescript
import {
  ExecutionContext,
  CallHandler,
  NestInterceptor,
  Injectable,
} from '@nestjs/common';
import * as Sentry from '@sentry/node';
import { Observable } from 'rxjs';
import { tap } from 'rxjs/operators';

@Injectable()
export class SentryInterceptor implements NestInterceptor {
  intercept(context: ExecutionContext, next: CallHandler): Observable<any> {
    return next.handle().pipe(
      tap({
        error: (exception) => {
          Sentry.captureException(exception);
        },
      }),
    );
  }
}
```"#,
    r#"src/main.ts:
```typescript
import { NestFactory } from '@nestjs/core';
import { AppModule } from './app.module';
import * as Sentry from '@sentry/node';
import { SentryInterceptor } from './interceptors/sentry.interceptor';

async function bootstrap() {
  // Initialize Sentry
  Sentry.init({
    dsn: process.env.SENTRY_DSN,
    // Set tracesSampleRate to 1.0 to capture 100% of transactions for performance monitoring
    tracesSampleRate: 1.0,
  });

  const app = await NestFactory.create(AppModule);
  app.useGlobalInterceptors(new SentryInterceptor());
  await app.listen(3000);
}
bootstrap();
```"#,
    r#"src/app.module.ts:
```typescript
import { Module } from '@nestjs/common';
import { ConfigModule } from '@nestjs/config';
import { AppController } from './app.controller';
import { AppService } from './app.service';

@Module({
  imports: [
    ConfigModule.forRoot({
      isGlobal: true,
    }),
  ],
  controllers: [AppController],
  providers: [AppService],
})
export class AppModule {}
```"#,
    ".env:\n```\nSENTRY_DSN=your-sentry-dsn-here\n```",
    "2. Install dependencies in the NestJS root folder:\n```bash\nnpm install --save @nestjs/config @sentry/node dotenv\n```",
    "3. Replace the SENTRY_DSN value in .env with your actual Sentry DSN",
    "4. Start the application:\n```bash\nnpm run start:dev\n```",
];

/// Handler for the `nestjs_sentry_scaffold` tool.
pub struct ScaffoldHandler;

impl ToolHandler for ScaffoldHandler {
    fn name(&self) -> &str {
        "nestjs_sentry_scaffold"
    }

    fn title(&self) -> Option<&str> {
        Some("NestJS + Sentry Scaffold")
    }

    fn description(&self) -> &str {
        "Step-by-step instructions and file contents for adding Sentry to a NestJS project."
    }

    fn input_schema(&self) -> JsonObject {
        schema_for::<ScaffoldArgs>()
    }

    fn execute(&self, _args: JsonObject, _ctx: &ToolContext) -> ToolFuture<'_> {
        let content = STEPS.iter().map(|step| Content::text(*step)).collect();
        Box::pin(std::future::ready(Ok(CallToolResult::success(content))))
    }
}
